use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single violated input rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub reason: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum RefiError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed ({} issue(s)): {}", .issues.len(), join_issues(.issues))]
    ValidationFailed { issues: Vec<ValidationIssue> },

    #[error("Invalid fee taxonomy: {0}")]
    InvalidTaxonomy(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RefiError {
    /// Every violated rule, for callers that present a correction list.
    pub fn issues(&self) -> Vec<ValidationIssue> {
        match self {
            RefiError::ValidationFailed { issues } => issues.clone(),
            RefiError::InvalidInput { field, reason } => {
                vec![ValidationIssue::new(field.clone(), reason.clone())]
            }
            _ => Vec::new(),
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for RefiError {
    fn from(e: serde_json::Error) -> Self {
        RefiError::SerializationError(e.to_string())
    }
}
