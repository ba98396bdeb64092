use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Production pipeline steps, in progression order.
///
/// The derived `Ord` follows declaration order, so "at or after" checks
/// are plain comparisons. Every stage-conditioned rule in the crate goes
/// through [`PipelineStep::requirements`] or [`Section::available_from`]
/// rather than ad hoc membership lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    /// Logline and synopsis are being drafted
    SynopsisPlanning,
    /// Treatment and scenario (scene list) are being written
    ScenarioDevelopment,
    /// Characters, locations, and props are being added
    AssetAddition,
    /// All concept-art blocks are present
    ConceptArtBlocksCompleted,
    /// Concept art is being generated from the blocks
    ConceptArtGeneration,
}

/// Error returned when a step string is not one of the known values
#[derive(Debug, Clone, Error)]
#[error("unrecognized pipeline step: {0}")]
pub struct ParseStepError(pub String);

impl PipelineStep {
    /// All steps in pipeline order
    pub const ALL: [PipelineStep; 5] = [
        PipelineStep::SynopsisPlanning,
        PipelineStep::ScenarioDevelopment,
        PipelineStep::AssetAddition,
        PipelineStep::ConceptArtBlocksCompleted,
        PipelineStep::ConceptArtGeneration,
    ];

    /// Wire-format name of this step
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::SynopsisPlanning => "synopsis_planning",
            PipelineStep::ScenarioDevelopment => "scenario_development",
            PipelineStep::AssetAddition => "asset_addition",
            PipelineStep::ConceptArtBlocksCompleted => "concept_art_blocks_completed",
            PipelineStep::ConceptArtGeneration => "concept_art_generation",
        }
    }

    /// What the document is expected to contain at this step
    pub fn requirements(&self) -> StepRequirements {
        StepRequirements {
            logline_synopsis: *self == PipelineStep::SynopsisPlanning,
            treatment: *self >= PipelineStep::ScenarioDevelopment,
            scenario: *self >= PipelineStep::ScenarioDevelopment,
            visual_blocks: *self >= PipelineStep::AssetAddition,
        }
    }

    /// Sections viewable at this step, in display order
    pub fn viewable_sections(&self) -> Vec<Section> {
        Section::ALL
            .iter()
            .copied()
            .filter(|s| *self >= s.available_from())
            .collect()
    }
}

impl FromStr for PipelineStep {
    type Err = ParseStepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineStep::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| ParseStepError(s.to_string()))
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substructures a document is expected to carry at a given step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRequirements {
    /// `current_work.logline` and `current_work.synopsis` expected
    pub logline_synopsis: bool,
    /// `current_work.treatment` with a title expected
    pub treatment: bool,
    /// `current_work.scenario` with scenes expected
    pub scenario: bool,
    /// `visual_blocks` with all three collections expected
    pub visual_blocks: bool,
}

/// Document sections exposed to viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Metadata,
    Synopsis,
    Treatment,
    Scenario,
    Characters,
    Locations,
    Props,
}

impl Section {
    /// All sections in display order
    pub const ALL: [Section; 7] = [
        Section::Metadata,
        Section::Synopsis,
        Section::Treatment,
        Section::Scenario,
        Section::Characters,
        Section::Locations,
        Section::Props,
    ];

    /// Earliest step at which this section becomes viewable
    pub fn available_from(&self) -> PipelineStep {
        match self {
            Section::Metadata | Section::Synopsis | Section::Treatment => {
                PipelineStep::SynopsisPlanning
            }
            Section::Scenario => PipelineStep::ScenarioDevelopment,
            Section::Characters | Section::Locations | Section::Props => {
                PipelineStep::AssetAddition
            }
        }
    }

    /// Display label for this section
    pub fn label(&self) -> &'static str {
        match self {
            Section::Metadata => "Metadata",
            Section::Synopsis => "Synopsis",
            Section::Treatment => "Treatment",
            Section::Scenario => "Scenario",
            Section::Characters => "Characters",
            Section::Locations => "Locations",
            Section::Props => "Props",
        }
    }
}
