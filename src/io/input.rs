use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{MergeInput, ValidationReport};
use crate::repair::parse_document;

/// Read a document file, returning its display name and raw text
pub fn read_document_file(path: &Path) -> Result<(String, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.json")
        .to_string();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok((name, raw))
}

/// Load one file as a merge input.
///
/// Parsing is lenient; when even repair cannot produce a document the
/// returned input is None and the report carries the syntax diagnostics.
pub fn load_merge_input(path: &Path) -> Result<(ValidationReport, Option<MergeInput>)> {
    let (name, raw) = read_document_file(path)?;
    let (report, document) = parse_document(&raw);
    let input = document.map(|doc| MergeInput::new(name, doc));
    Ok((report, input))
}
