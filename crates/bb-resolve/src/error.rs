//! Error types for BOM resolution.

use bb_model::{ModelError, ValidationIssue};
use thiserror::Error;

/// Errors that abort a resolution. No partial BOM is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BomError {
    /// Dangling or inconsistent references found before traversal.
    #[error("Structural error: {0}")]
    Structural(#[from] ModelError),

    /// A traversal path re-entered an id already on that path.
    #[error("Cycle detected at '{id}' via {}", .path.join(" -> "))]
    Cycle { id: String, path: Vec<String> },

    /// The product of multipliers along a path does not fit in a `u64`.
    #[error("Quantity overflow at '{id}' via {}", .path.join(" -> "))]
    QuantityOverflow { id: String, path: Vec<String> },
}

impl BomError {
    /// Validation issues carried by a structural error, empty otherwise.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            BomError::Structural(err) => err.issues(),
            _ => &[],
        }
    }
}

pub type BomResult<T> = Result<T, BomError>;
