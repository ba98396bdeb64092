use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineStep;

use super::Stage1Document;

/// Placeholder identity for documents that carry no usable film_id
pub const UNKNOWN_FILM_ID: &str = "UNKNOWN";

/// What a file contributes to a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    /// Carries the narrative (scenario) content
    Main,
    /// Carries asset collections
    Asset,
    /// Could not be classified
    Unknown,
}

/// One parsed document queued for merging
#[derive(Debug, Clone)]
pub struct MergeInput {
    /// Generated identifier for this input
    pub id: String,
    /// Source file name, used in warnings and errors
    pub name: String,
    pub document: Stage1Document,
    pub role: FileRole,
    /// The document's film_id, or [`UNKNOWN_FILM_ID`]
    pub film_id: String,
}

impl MergeInput {
    /// Wrap a parsed document, inferring its role and identity.
    ///
    /// A document in scenario development, or carrying a scenario, is main;
    /// one in asset addition, or carrying any visual block records, is an
    /// asset file; anything else is unknown.
    pub fn new(name: impl Into<String>, document: Stage1Document) -> Self {
        let role = if document.step() == Some(PipelineStep::ScenarioDevelopment)
            || document.has_scenario()
        {
            FileRole::Main
        } else if document.step() == Some(PipelineStep::AssetAddition)
            || document.visual_blocks().has_any()
        {
            FileRole::Asset
        } else {
            FileRole::Unknown
        };

        let film_id = document
            .film_id()
            .filter(|id| !id.is_empty())
            .unwrap_or(UNKNOWN_FILM_ID)
            .to_string();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            document,
            role,
            film_id,
        }
    }
}

/// Result of merging a set of documents
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub success: bool,
    /// The consolidated document, on success
    pub merged: Option<Stage1Document>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl MergeOutcome {
    /// A merge that was abandoned wholesale
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            success: false,
            merged: None,
            errors,
            warnings: vec![],
        }
    }

    /// A completed merge with any collected warnings
    pub fn merged(document: Stage1Document, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            merged: Some(document),
            errors: vec![],
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Stage1Document {
        Stage1Document::from_value(&value)
    }

    #[test]
    fn test_infer_main_from_step() {
        let input = MergeInput::new(
            "a.json",
            doc(json!({"film_id": "F1", "current_step": "scenario_development"})),
        );
        assert_eq!(input.role, FileRole::Main);
        assert_eq!(input.film_id, "F1");
    }

    #[test]
    fn test_infer_main_from_scenario() {
        let input = MergeInput::new(
            "a.json",
            doc(json!({"current_work": {"scenario": {"scenes": []}}})),
        );
        assert_eq!(input.role, FileRole::Main);
        assert_eq!(input.film_id, UNKNOWN_FILM_ID);
    }

    #[test]
    fn test_infer_asset_from_blocks() {
        let input = MergeInput::new(
            "b.json",
            doc(json!({
                "film_id": "F1",
                "current_step": "synopsis_planning",
                "visual_blocks": {"props": [{"id": "p1", "name": "Sword"}]}
            })),
        );
        assert_eq!(input.role, FileRole::Asset);
    }

    #[test]
    fn test_infer_unknown() {
        let input = MergeInput::new("c.json", doc(json!({"film_id": "F1"})));
        assert_eq!(input.role, FileRole::Unknown);
    }

    #[test]
    fn test_empty_film_id_is_unknown() {
        let input = MergeInput::new("d.json", doc(json!({"film_id": ""})));
        assert_eq!(input.film_id, UNKNOWN_FILM_ID);
    }
}
