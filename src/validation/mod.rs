use serde_json::{Map, Value};

use crate::models::{Diagnostic, DiagnosticCategory, Stage1Document};
use crate::pipeline::StepRequirements;

/// Validate a structurally parsed document against its declared step.
///
/// Runs every rule group in a fixed order (essential, story, visual, type
/// spot-checks, unknown fields) so diagnostic ordering is reproducible.
/// Nothing here short-circuits or mutates the document; malformed optional
/// substructure is reported, never rejected.
pub fn validate_document(doc: &Stage1Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    check_essential_fields(doc, &mut diagnostics);

    // Stage-conditioned rules need a recognized step; an unknown or missing
    // step was already reported above.
    if let Some(step) = doc.step() {
        let requirements = step.requirements();
        check_story(doc, &requirements, &mut diagnostics);
        if requirements.visual_blocks {
            check_visual(doc, &mut diagnostics);
        }
    }

    check_types(doc, &mut diagnostics);
    check_unknown_fields(doc, &mut diagnostics);

    diagnostics
}

/// Missing, null, or an empty string: nothing usable at this key
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn check_essential_fields(doc: &Stage1Document, out: &mut Vec<Diagnostic>) {
    if is_blank(doc.film_id.as_ref()) {
        out.push(Diagnostic::error(
            DiagnosticCategory::Essential,
            "film_id",
            "film_id is missing",
        ));
    } else if !doc.film_id.as_ref().is_some_and(Value::is_string) {
        out.push(Diagnostic::error(
            DiagnosticCategory::Schema,
            "film_id",
            "film_id must be a string",
        ));
    }

    if is_blank(doc.current_step.as_ref()) {
        out.push(Diagnostic::error(
            DiagnosticCategory::Essential,
            "current_step",
            "current_step is missing",
        ));
    } else if doc.step().is_none() {
        let raw = doc.current_step.as_ref().map(value_summary).unwrap_or_default();
        out.push(Diagnostic::error(
            DiagnosticCategory::Schema,
            "current_step",
            format!("invalid pipeline step (current_step): {raw}"),
        ));
    }

    if is_blank(doc.film_metadata.as_ref()) {
        out.push(Diagnostic::error(
            DiagnosticCategory::Essential,
            "film_metadata",
            "film_metadata is missing",
        ));
    }

    if is_blank(doc.timestamp.as_ref()) {
        out.push(Diagnostic::error(
            DiagnosticCategory::Essential,
            "timestamp",
            "timestamp is missing",
        ));
    }
}

fn check_story(doc: &Stage1Document, requirements: &StepRequirements, out: &mut Vec<Diagnostic>) {
    let empty = Map::new();
    let work = doc
        .current_work
        .as_ref()
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    if requirements.logline_synopsis {
        if is_blank(work.get("logline")) {
            out.push(Diagnostic::warning(
                DiagnosticCategory::Story,
                "current_work.logline",
                "logline is missing",
            ));
        }
        if is_blank(work.get("synopsis")) {
            out.push(Diagnostic::warning(
                DiagnosticCategory::Story,
                "current_work.synopsis",
                "synopsis is missing",
            ));
        }
    }

    if requirements.treatment {
        if is_blank(work.get("treatment")) {
            out.push(Diagnostic::warning(
                DiagnosticCategory::Story,
                "current_work.treatment",
                "treatment object is missing",
            ));
        } else if is_blank(field(work.get("treatment"), "treatment_title")) {
            out.push(Diagnostic::warning(
                DiagnosticCategory::Story,
                "current_work.treatment.treatment_title",
                "treatment_title is missing",
            ));
        }
    }

    if requirements.scenario {
        let scenario = work.get("scenario");
        if is_blank(scenario) {
            // Blocking: the step claims scenario development is done
            out.push(Diagnostic::error(
                DiagnosticCategory::Story,
                "current_work.scenario",
                "scenario object is missing",
            ));
        } else {
            if is_blank(field(scenario, "scenario_title")) {
                out.push(Diagnostic::warning(
                    DiagnosticCategory::Story,
                    "current_work.scenario.scenario_title",
                    "scenario_title is missing",
                ));
            }
            let scenes_present = field(scenario, "scenes")
                .and_then(Value::as_array)
                .is_some_and(|scenes| !scenes.is_empty());
            if !scenes_present {
                out.push(Diagnostic::warning(
                    DiagnosticCategory::Story,
                    "current_work.scenario.scenes",
                    "scenes array is empty or missing",
                ));
            }
        }
    }
}

fn check_visual(doc: &Stage1Document, out: &mut Vec<Diagnostic>) {
    if is_blank(doc.visual_blocks.as_ref()) {
        out.push(Diagnostic::error(
            DiagnosticCategory::Visual,
            "visual_blocks",
            "visual_blocks object is missing at the top level",
        ));
        return;
    }

    let empty = Map::new();
    let blocks = doc
        .visual_blocks
        .as_ref()
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    for key in ["characters", "locations", "props"] {
        let path = format!("visual_blocks.{key}");
        match blocks.get(key).and_then(Value::as_array) {
            None => out.push(Diagnostic::error(
                DiagnosticCategory::Visual,
                &path,
                format!("{key} array is missing"),
            )),
            Some(items) if items.is_empty() => out.push(Diagnostic::warning(
                DiagnosticCategory::Visual,
                &path,
                format!("{key} list is empty"),
            )),
            Some(_) => {}
        }
    }
}

fn check_types(doc: &Stage1Document, out: &mut Vec<Diagnostic>) {
    let metadata = match doc.film_metadata.as_ref().and_then(Value::as_object) {
        Some(metadata) => metadata,
        None => return,
    };

    if let Some(duration) = metadata.get("duration_minutes") {
        if !duration.is_number() {
            out.push(Diagnostic::error(
                DiagnosticCategory::Schema,
                "film_metadata.duration_minutes",
                "duration_minutes must be a number",
            ));
        }
    }

    if let Some(artist) = metadata.get("artist") {
        if !artist.is_null() && !artist.is_string() {
            out.push(Diagnostic::error(
                DiagnosticCategory::Schema,
                "film_metadata.artist",
                "artist must be a string",
            ));
        }
    }
}

fn check_unknown_fields(doc: &Stage1Document, out: &mut Vec<Diagnostic>) {
    for key in doc.extra.keys() {
        out.push(Diagnostic::info(
            DiagnosticCategory::Other,
            key,
            format!("unknown top-level field: {key}"),
        ));
    }
}

fn field<'a>(value: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    value.and_then(Value::as_object).and_then(|obj| obj.get(key))
}

fn value_summary(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use serde_json::json;

    fn validate(value: serde_json::Value) -> Vec<Diagnostic> {
        validate_document(&Stage1Document::from_value(&value))
    }

    fn complete_doc() -> serde_json::Value {
        json!({
            "film_id": "F1",
            "current_step": "scenario_development",
            "timestamp": "2025-11-02T10:00:00Z",
            "film_metadata": {"title": "Test", "duration_minutes": 90},
            "current_work": {
                "treatment": {"treatment_title": "T", "sequences": []},
                "scenario": {
                    "scenario_title": "T",
                    "scenes": [{"scene_id": "s1", "scene_number": 1}]
                }
            }
        })
    }

    #[test]
    fn test_complete_document_is_clean() {
        assert!(validate(complete_doc()).is_empty());
    }

    #[test]
    fn test_missing_essentials() {
        let diagnostics = validate(json!({}));
        let paths: Vec<&str> = diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["film_id", "current_step", "film_metadata", "timestamp"]
        );
        assert!(diagnostics
            .iter()
            .all(|d| d.category == DiagnosticCategory::Essential));
    }

    #[test]
    fn test_empty_film_id_is_essential_not_schema() {
        let mut doc = complete_doc();
        doc["film_id"] = json!("");
        let diagnostics = validate(doc);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].category, DiagnosticCategory::Essential);
        assert_eq!(diagnostics[0].path, "film_id");
    }

    #[test]
    fn test_non_string_film_id_is_schema() {
        let mut doc = complete_doc();
        doc["film_id"] = json!(42);
        let diagnostics = validate(doc);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].category, DiagnosticCategory::Schema);
    }

    #[test]
    fn test_unknown_step_is_schema_error() {
        let mut doc = complete_doc();
        doc["current_step"] = json!("treatment_expansion");
        let diagnostics = validate(doc);
        // One schema error for the step; stage-conditioned rules are skipped
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].category, DiagnosticCategory::Schema);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert!(diagnostics[0].message.contains("treatment_expansion"));
    }

    #[test]
    fn test_early_stage_tolerates_missing_scenario() {
        let diagnostics = validate(json!({
            "film_id": "F1",
            "current_step": "synopsis_planning",
            "timestamp": "t",
            "film_metadata": {},
            "current_work": {"logline": "a hero", "synopsis": "rises"}
        }));
        assert!(diagnostics
            .iter()
            .all(|d| d.severity != Severity::Error));
    }

    #[test]
    fn test_early_stage_warns_on_missing_logline() {
        let diagnostics = validate(json!({
            "film_id": "F1",
            "current_step": "synopsis_planning",
            "timestamp": "t",
            "film_metadata": {}
        }));
        let story: Vec<&Diagnostic> = diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Story)
            .collect();
        assert_eq!(story.len(), 2);
        assert!(story.iter().all(|d| d.severity == Severity::Warning));
        assert_eq!(story[0].path, "current_work.logline");
        assert_eq!(story[1].path, "current_work.synopsis");
    }

    #[test]
    fn test_missing_scenario_is_error_at_and_after_scenario_development() {
        for step in [
            "scenario_development",
            "asset_addition",
            "concept_art_blocks_completed",
            "concept_art_generation",
        ] {
            let diagnostics = validate(json!({
                "film_id": "F1",
                "current_step": step,
                "timestamp": "t",
                "film_metadata": {},
                "visual_blocks": {
                    "characters": [{"id": "c1", "name": "Al"}],
                    "locations": [{"id": "l1", "name": "Bar"}],
                    "props": [{"id": "p1", "name": "Cup"}]
                }
            }));
            let errors: Vec<&Diagnostic> = diagnostics
                .iter()
                .filter(|d| {
                    d.severity == Severity::Error && d.category == DiagnosticCategory::Story
                })
                .collect();
            assert_eq!(errors.len(), 1, "step {step}");
            assert_eq!(errors[0].path, "current_work.scenario");
        }
    }

    #[test]
    fn test_scenario_detail_warnings() {
        let mut doc = complete_doc();
        doc["current_work"]["scenario"] = json!({"scenes": []});
        let diagnostics = validate(doc);
        let paths: Vec<&str> = diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "current_work.scenario.scenario_title",
                "current_work.scenario.scenes"
            ]
        );
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn test_visual_rules() {
        let diagnostics = validate(json!({
            "film_id": "F1",
            "current_step": "asset_addition",
            "timestamp": "t",
            "film_metadata": {},
            "visual_blocks": {"characters": [{"id": "c1", "name": "Al"}], "locations": []}
        }));
        let visual: Vec<&Diagnostic> = diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Visual)
            .collect();
        // locations empty (warning), props missing (error)
        assert_eq!(visual.len(), 2);
        assert_eq!(visual[0].path, "visual_blocks.locations");
        assert_eq!(visual[0].severity, Severity::Warning);
        assert_eq!(visual[1].path, "visual_blocks.props");
        assert_eq!(visual[1].severity, Severity::Error);
    }

    #[test]
    fn test_missing_visual_blocks_is_single_error() {
        let diagnostics = validate(json!({
            "film_id": "F1",
            "current_step": "concept_art_generation",
            "timestamp": "t",
            "film_metadata": {},
            "current_work": {
                "treatment": {"treatment_title": "T"},
                "scenario": {"scenario_title": "T", "scenes": [{"scene_id": "s1"}]}
            }
        }));
        let visual: Vec<&Diagnostic> = diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Visual)
            .collect();
        assert_eq!(visual.len(), 1);
        assert_eq!(visual[0].path, "visual_blocks");
        assert_eq!(visual[0].severity, Severity::Error);
    }

    #[test]
    fn test_duration_type_check() {
        let mut doc = complete_doc();
        doc["film_metadata"]["duration_minutes"] = json!("90");
        let diagnostics = validate(doc);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "film_metadata.duration_minutes");
        assert_eq!(diagnostics[0].category, DiagnosticCategory::Schema);
    }

    #[test]
    fn test_artist_type_check() {
        let mut doc = complete_doc();
        doc["film_metadata"]["artist"] = json!(["a", "b"]);
        let diagnostics = validate(doc);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "film_metadata.artist");
    }

    #[test]
    fn test_unknown_field_is_info() {
        let mut doc = complete_doc();
        doc["production_notes"] = json!("keep");
        let diagnostics = validate(doc);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Info);
        assert_eq!(diagnostics[0].category, DiagnosticCategory::Other);
        assert_eq!(diagnostics[0].path, "production_notes");
    }

    #[test]
    fn test_rule_group_ordering() {
        let diagnostics = validate(json!({
            "current_step": "asset_addition",
            "film_metadata": {"duration_minutes": "x"},
            "zz_extra": true
        }));
        let categories: Vec<DiagnosticCategory> =
            diagnostics.iter().map(|d| d.category).collect();
        assert_eq!(
            categories,
            vec![
                DiagnosticCategory::Essential, // film_id
                DiagnosticCategory::Essential, // timestamp
                DiagnosticCategory::Story,     // treatment
                DiagnosticCategory::Story,     // scenario
                DiagnosticCategory::Visual,    // visual_blocks
                DiagnosticCategory::Schema,    // duration_minutes
                DiagnosticCategory::Other,     // zz_extra
            ]
        );
    }
}
