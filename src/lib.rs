pub mod io;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod repair;
pub mod validation;

pub use io::{
    load_merge_input, merged_file_name, read_document_file, render_report, write_merged_file,
};
pub use merge::merge_documents;
pub use models::{
    AssetRecord, CurrentWork, Diagnostic, DiagnosticCategory, FileRole, MergeInput, MergeOutcome,
    Scenario, Scene, Severity, Stage1Document, Treatment, ValidationReport, VisualBlocks,
};
pub use pipeline::{ParseStepError, PipelineStep, Section, StepRequirements};
pub use repair::parse_document;
pub use validation::validate_document;
