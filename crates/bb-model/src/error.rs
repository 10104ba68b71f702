//! Model-specific error types.

use thiserror::Error;

use crate::validate::ValidationIssue;

pub type ModelResult<T> = Result<T, ModelError>;

/// Diagram construction and validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// One or more dangling or inconsistent references; all of them are listed.
    #[error("Diagram has {} structural issue(s): {}", .issues.len(), join_issues(.issues))]
    Structural { issues: Vec<ValidationIssue> },

    #[error("Element not found: {id}")]
    NotFound { id: String },

    #[error("Unknown node shape: {name}")]
    UnknownShape { name: String },
}

impl ModelError {
    /// The reported issues when this is a structural error, empty otherwise.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            ModelError::Structural { issues } => issues,
            _ => &[],
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
