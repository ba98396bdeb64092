pub mod brackets;
pub mod commas;
pub mod fences;
pub mod strings;

pub use brackets::*;
pub use commas::*;
pub use fences::*;
pub use strings::*;

use serde_json::Value;
use tracing::debug;

use crate::models::{
    Diagnostic, DiagnosticCategory, Severity, Stage1Document, ValidationReport,
};

type RepairFn = fn(&str) -> Option<String>;

struct RepairStep {
    apply: RepairFn,
    severity: Severity,
    message: &'static str,
}

/// Repair transforms in application order. Each is a pure, single-purpose
/// text edit; the strict parse is retried after every one that fires.
const REPAIR_STEPS: [RepairStep; 4] = [
    RepairStep {
        apply: strip_code_fences,
        severity: Severity::Info,
        message: "removed a Markdown code fence around the JSON payload",
    },
    RepairStep {
        apply: strip_trailing_commas,
        severity: Severity::Info,
        message: "removed trailing commas before a closing bracket",
    },
    RepairStep {
        apply: close_unterminated_string,
        severity: Severity::Warning,
        message: "closed an unterminated string at the end of the document",
    },
    RepairStep {
        apply: balance_brackets,
        severity: Severity::Warning,
        message: "appended missing closing brackets",
    },
];

/// Parse raw text into a document, repairing bounded syntax damage.
///
/// Returns the structural report and, when the text (possibly after
/// repair) parses, the projected document. Semantic validation is a
/// separate pass; this function only decides structural validity.
pub fn parse_document(raw: &str) -> (ValidationReport, Option<Stage1Document>) {
    let first_err = match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            return (
                ValidationReport::valid(),
                Some(Stage1Document::from_value(&value)),
            );
        }
        Err(err) => err,
    };

    let mut text = raw.to_string();
    let mut applied = Vec::new();

    for step in &REPAIR_STEPS {
        let Some(fixed) = (step.apply)(&text) else {
            continue;
        };
        debug!(repair = step.message, "applied repair transform");
        text = fixed;
        applied.push(Diagnostic {
            severity: step.severity,
            category: DiagnosticCategory::Schema,
            path: "$".to_string(),
            message: step.message.to_string(),
            suggestion: None,
        });

        if let Ok(value) = serde_json::from_str::<Value>(&text) {
            let document = Stage1Document::from_value(&value);
            return (ValidationReport::repaired(text, applied), Some(document));
        }
    }

    let mut diagnostic = Diagnostic::error(
        DiagnosticCategory::Schema,
        "$",
        format!("JSON syntax error: {first_err}"),
    );
    if let Some(line) = raw.lines().nth(first_err.line().saturating_sub(1)) {
        let line = line.trim();
        if !line.is_empty() {
            diagnostic = diagnostic.with_suggestion(line.to_string());
        }
    }

    (ValidationReport::invalid(vec![diagnostic]), None)
}
