use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pipeline::PipelineStep;

/// A Stage 1 production document as found on the wire.
///
/// Top-level fields are individually optional and kept as raw JSON values:
/// a missing or wrong-shaped substructure must reach the validator as a
/// diagnosable fact, not fail deserialization. Unknown top-level keys are
/// collected into `extra` for unknown-field reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage1Document {
    /// Grouping key for merge-eligible documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub film_id: Option<Value>,
    /// Declared pipeline step (see [`PipelineStep`])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<Value>,
    /// Document timestamp, presence-checked only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    /// Production-level descriptive fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub film_metadata: Option<Value>,
    /// Narrative artifacts: logline, synopsis, treatment, scenario
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_work: Option<Value>,
    /// Asset collections: characters, locations, props
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_blocks: Option<Value>,
    /// Top-level keys outside the known set
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stage1Document {
    /// Project a parsed JSON tree into a document.
    ///
    /// A non-object root projects to an empty document; the validator then
    /// reports every essential field as missing.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => {
                serde_json::from_value(value.clone()).unwrap_or_default()
            }
            _ => Stage1Document::default(),
        }
    }

    /// Serialize back to a JSON tree
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// The film id, when present and string-typed
    pub fn film_id(&self) -> Option<&str> {
        self.film_id.as_ref().and_then(Value::as_str)
    }

    /// The declared step, when present and a known value
    pub fn step(&self) -> Option<PipelineStep> {
        self.current_step
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// Whether `current_work.scenario` is present (any non-null value)
    pub fn has_scenario(&self) -> bool {
        self.current_work
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|cw| cw.get("scenario"))
            .is_some_and(|v| !v.is_null())
    }

    /// Typed view of the narrative content, empty where the shape is off
    pub fn current_work(&self) -> CurrentWork {
        self.current_work
            .as_ref()
            .map(CurrentWork::from_value)
            .unwrap_or_default()
    }

    /// Typed view of the asset collections, empty where the shape is off
    pub fn visual_blocks(&self) -> VisualBlocks {
        self.visual_blocks
            .as_ref()
            .map(VisualBlocks::from_value)
            .unwrap_or_default()
    }
}

/// Narrative artifacts attached to a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<Treatment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Scenario>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CurrentWork {
    fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Treatment: a titled, ordered list of sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_title: Option<String>,
    #[serde(default)]
    pub sequences: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scenario: a titled, ordered list of scenes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_title: Option<String>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single scene within a scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Unique identifier within the scenario
    #[serde(default)]
    pub scene_id: String,
    /// Display number, as authored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_number: Option<Value>,
    /// Owning sequence identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<String>,
    /// Scene text
    #[serde(default)]
    pub scenario_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The three asset collections, always considered together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualBlocks {
    #[serde(default)]
    pub characters: Vec<AssetRecord>,
    #[serde(default)]
    pub locations: Vec<AssetRecord>,
    #[serde(default)]
    pub props: Vec<AssetRecord>,
}

impl VisualBlocks {
    /// Lenient projection: each collection is read independently, and
    /// elements that are not objects are dropped.
    pub fn from_value(value: &Value) -> Self {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return VisualBlocks::default(),
        };
        VisualBlocks {
            characters: records_from(obj.get("characters")),
            locations: records_from(obj.get("locations")),
            props: records_from(obj.get("props")),
        }
    }

    /// Whether any collection holds at least one record
    pub fn has_any(&self) -> bool {
        !self.characters.is_empty() || !self.locations.is_empty() || !self.props.is_empty()
    }

    /// The collections with their wire names, in fixed order
    pub fn collections(&self) -> [(&'static str, &[AssetRecord]); 3] {
        [
            ("characters", self.characters.as_slice()),
            ("locations", self.locations.as_slice()),
            ("props", self.props.as_slice()),
        ]
    }

    /// Total record count across all collections
    pub fn record_count(&self) -> usize {
        self.characters.len() + self.locations.len() + self.props.len()
    }
}

fn records_from(value: Option<&Value>) -> Vec<AssetRecord> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// One character, location, or prop record.
///
/// Only `id` (the merge key) and `name` are interpreted; everything else is
/// carried opaquely in `extra` so a merge round-trips unmodified fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
