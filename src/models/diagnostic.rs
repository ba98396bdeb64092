use serde::{Deserialize, Serialize};

/// How serious a diagnostic is, independent of its category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Must be fixed before the document is usable
    Error,
    /// Degraded but usable
    Warning,
    /// No action implied
    Info,
}

/// What part of the ruleset produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCategory {
    /// A structurally required field is missing
    Essential,
    /// Present but wrong type, or an invalid enumerated value
    Schema,
    /// Narrative substructure missing or incomplete for the declared step
    Story,
    /// Asset substructure missing or incomplete for the declared step
    Visual,
    /// Unrecognized field or other informational finding
    Other,
}

/// One reported issue, surfaced without aborting processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: DiagnosticCategory,
    /// Dotted locator into the document (e.g. `current_work.scenario`)
    pub path: String,
    pub message: String,
    /// Repaired snippet or other fix hint, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(category: DiagnosticCategory, path: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, path, message)
    }

    pub fn warning(category: DiagnosticCategory, path: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, path, message)
    }

    pub fn info(category: DiagnosticCategory, path: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, path, message)
    }

    fn new(
        severity: Severity,
        category: DiagnosticCategory,
        path: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.to_string(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attach a fix hint
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Outcome of parsing and validating one piece of raw text.
///
/// `is_valid` reflects structural parse success only: semantic diagnostics
/// are appended to `diagnostics` but never flip the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// Corrected text, when auto-repair produced the parse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repaired_text: Option<String>,
    /// Number of repair transforms that were applied
    pub repair_count: usize,
}

impl ValidationReport {
    /// A clean structural parse with no repairs
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            diagnostics: vec![],
            repaired_text: None,
            repair_count: 0,
        }
    }

    /// A structural parse that succeeded after repair
    pub fn repaired(repaired_text: String, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            is_valid: true,
            repair_count: diagnostics.len(),
            diagnostics,
            repaired_text: Some(repaired_text),
        }
    }

    /// A structural parse failure
    pub fn invalid(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            is_valid: false,
            diagnostics,
            repaired_text: None,
            repair_count: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let diag = Diagnostic::warning(DiagnosticCategory::Story, "current_work.logline", "missing")
            .with_suggestion("add a logline");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.path, "current_work.logline");
        assert_eq!(diag.suggestion.as_deref(), Some("add a logline"));
    }

    #[test]
    fn test_counts() {
        let mut report = ValidationReport::valid();
        report
            .diagnostics
            .push(Diagnostic::error(DiagnosticCategory::Essential, "film_id", "missing"));
        report
            .diagnostics
            .push(Diagnostic::warning(DiagnosticCategory::Visual, "visual_blocks.props", "empty"));
        report
            .diagnostics
            .push(Diagnostic::info(DiagnosticCategory::Other, "notes", "unknown field"));

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.info_count(), 1);
        // Semantic errors do not affect structural validity
        assert!(report.is_valid);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let json = serde_json::to_string(&DiagnosticCategory::Essential).unwrap();
        assert_eq!(json, "\"essential\"");
    }
}
