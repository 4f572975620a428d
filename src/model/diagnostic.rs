use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic emitted while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Info,
}

/// The pipeline stage that produced the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticPhase {
    /// The markup parser recovered from malformed input.
    Markup,
    /// The row formatter met a node shape it handles best-effort.
    Format,
}

/// A structured diagnostic describing a recovered problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<DiagnosticPhase>,

    /// A stable identifier like `markup.parse_error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human readable message.
    pub message: String,

    /// The row the diagnostic refers to, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl Diagnostic {
    pub fn warning(phase: DiagnosticPhase, code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, phase, code, message)
    }

    pub fn info(phase: DiagnosticPhase, code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, phase, code, message)
    }

    fn new(
        severity: Severity,
        phase: DiagnosticPhase,
        code: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            phase: Some(phase),
            code: Some(code.to_string()),
            message: message.into(),
            row: None,
        }
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}
