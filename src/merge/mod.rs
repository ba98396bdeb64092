use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};

use crate::models::{AssetRecord, MergeInput, MergeOutcome, Stage1Document, VisualBlocks};
use crate::pipeline::PipelineStep;

/// Merge a set of parsed documents sharing one film_id.
///
/// The base document (the main file, or the first input) seeds the merged
/// output; its narrative content is carried verbatim. Asset records from
/// the remaining inputs are appended in input order, deduplicated by id,
/// with one warning per dropped duplicate. Inputs are never mutated.
pub fn merge_documents(inputs: &[MergeInput]) -> MergeOutcome {
    if inputs.is_empty() {
        return MergeOutcome::failed(vec!["no files to merge".to_string()]);
    }

    let film_id = &inputs[0].film_id;
    let mismatched: Vec<&str> = inputs
        .iter()
        .filter(|input| &input.film_id != film_id)
        .map(|input| input.name.as_str())
        .collect();
    if !mismatched.is_empty() {
        return MergeOutcome::failed(vec![format!(
            "all files must share the same film_id (expected: {film_id}, mismatched: {})",
            mismatched.join(", ")
        )]);
    }

    let base_index = inputs
        .iter()
        .position(|input| {
            input.document.step() == Some(PipelineStep::ScenarioDevelopment)
                || input.document.has_scenario()
        })
        .unwrap_or(0);
    let base = &inputs[base_index];
    debug!(base = %base.name, "selected merge base");

    let mut merged = base.document.clone();
    let mut blocks = merged.visual_blocks();

    let mut seen_characters: HashSet<String> =
        blocks.characters.iter().map(|r| r.id.clone()).collect();
    let mut seen_locations: HashSet<String> =
        blocks.locations.iter().map(|r| r.id.clone()).collect();
    let mut seen_props: HashSet<String> = blocks.props.iter().map(|r| r.id.clone()).collect();

    let mut warnings = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        if index == base_index {
            continue;
        }
        let incoming = input.document.visual_blocks();
        merge_collection(
            &mut blocks.characters,
            &mut seen_characters,
            &incoming.characters,
            "character",
            &input.name,
            &mut warnings,
        );
        merge_collection(
            &mut blocks.locations,
            &mut seen_locations,
            &incoming.locations,
            "location",
            &input.name,
            &mut warnings,
        );
        merge_collection(
            &mut blocks.props,
            &mut seen_props,
            &incoming.props,
            "prop",
            &input.name,
            &mut warnings,
        );
    }

    write_blocks(&mut merged, &blocks);

    // Any asset data means the production has entered asset completion;
    // the step only ever advances.
    if blocks.has_any() {
        let completed = PipelineStep::ConceptArtBlocksCompleted;
        if merged.step().is_none_or(|step| step < completed) {
            merged.current_step = Some(Value::String(completed.as_str().to_string()));
        }
    }

    info!(
        inputs = inputs.len(),
        records = blocks.record_count(),
        warnings = warnings.len(),
        "merge complete"
    );

    MergeOutcome::merged(merged, warnings)
}

fn merge_collection(
    target: &mut Vec<AssetRecord>,
    seen: &mut HashSet<String>,
    incoming: &[AssetRecord],
    label: &str,
    source: &str,
    warnings: &mut Vec<String>,
) {
    for record in incoming {
        if seen.contains(&record.id) {
            warnings.push(format!(
                "[{source}] duplicate {label} id ignored: {} ({})",
                record.id, record.name
            ));
        } else {
            seen.insert(record.id.clone());
            target.push(record.clone());
        }
    }
}

/// Write the merged collections back, keeping any other keys the base's
/// visual_blocks object carried.
fn write_blocks(merged: &mut Stage1Document, blocks: &VisualBlocks) {
    let mut object = merged
        .visual_blocks
        .as_ref()
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    object.insert("characters".to_string(), records_value(&blocks.characters));
    object.insert("locations".to_string(), records_value(&blocks.locations));
    object.insert("props".to_string(), records_value(&blocks.props));
    merged.visual_blocks = Some(Value::Object(object));
}

fn records_value(records: &[AssetRecord]) -> Value {
    serde_json::to_value(records).unwrap_or_else(|_| Value::Array(Vec::new()))
}
