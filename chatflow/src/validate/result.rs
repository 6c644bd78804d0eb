//! Findings and the aggregated verdict.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single finding, with a stable code and the node it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub node_id: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, node_id: Option<&str>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: message.into(),
            node_id: node_id.map(str::to_string),
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, node_id: Option<&str>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Warning,
            message: message.into(),
            node_id: node_id.map(str::to_string),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "[{}] {} (node '{}')", self.code, self.message, id),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Verdict handed back to the editor. `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Split diagnostics by severity, keeping their relative order.
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for d in diagnostics {
            match d.severity {
                Severity::Error => errors.push(d.message.clone()),
                Severity::Warning => warnings.push(d.message.clone()),
            }
        }
        ValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Result for input that could not be decoded at all.
    pub fn rejected(message: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            errors: vec![message.into()],
            warnings: Vec::new(),
        }
    }
}
