use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{
    Diagnostic, DiagnosticCategory, Severity, Stage1Document, ValidationReport, UNKNOWN_FILM_ID,
};

/// Render a validation report as human-readable text
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();

    out.push_str("Validation Report\n");
    out.push_str("=================\n");
    out.push_str(if report.is_valid {
        "Status: all checks passed structurally\n"
    } else {
        "Status: structural issues found\n"
    });
    out.push_str(&format!(
        "Errors: {}  Warnings: {}  Info: {}\n",
        report.error_count(),
        report.warning_count(),
        report.info_count()
    ));
    if report.repair_count > 0 {
        out.push_str(&format!(
            "Auto-repair: {} syntax fix(es) applied\n",
            report.repair_count
        ));
    }

    if !report.diagnostics.is_empty() {
        out.push('\n');
        for diagnostic in &report.diagnostics {
            out.push_str(&render_diagnostic(diagnostic));
        }
    }

    out.push_str(&format!(
        "\nGenerated: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out
}

fn render_diagnostic(diagnostic: &Diagnostic) -> String {
    let mut line = format!(
        "[{}/{}] {}: {}\n",
        severity_label(diagnostic.severity),
        category_label(diagnostic.category),
        diagnostic.path,
        diagnostic.message
    );
    if let Some(suggestion) = &diagnostic.suggestion {
        line.push_str(&format!("    suggestion: {suggestion}\n"));
    }
    line
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "info",
    }
}

fn category_label(category: DiagnosticCategory) -> &'static str {
    match category {
        DiagnosticCategory::Essential => "essential",
        DiagnosticCategory::Schema => "schema",
        DiagnosticCategory::Story => "story",
        DiagnosticCategory::Visual => "visual",
        DiagnosticCategory::Other => "other",
    }
}

/// Write a document as pretty-printed JSON
pub fn write_merged_file(document: &Stage1Document, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, &document.to_value())
        .context("Failed to write merged JSON")?;
    Ok(())
}

/// Download-style file name for a merged document
pub fn merged_file_name(document: &Stage1Document) -> String {
    let film_id = document
        .film_id()
        .filter(|id| !id.is_empty())
        .unwrap_or(UNKNOWN_FILM_ID);
    format!("{film_id}_stage1_v1.1.json")
}
