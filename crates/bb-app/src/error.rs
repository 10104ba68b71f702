//! Error types for the bb-app service layer.

use std::path::PathBuf;

/// Application error type shared by the command-line front end and tests.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to load diagram: {path}: {source}")]
    DiagramLoad {
        path: PathBuf,
        source: bb_project::ProjectError,
    },

    #[error("Failed to load metadata: {path}: {source}")]
    MetadataLoad {
        path: PathBuf,
        source: bb_project::ProjectError,
    },

    #[error("Failed to write output: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Diagram validation failed: {0}")]
    Validation(#[from] bb_model::ModelError),

    #[error("BOM resolution failed: {0}")]
    Resolve(#[from] bb_resolve::BomError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bb-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Render(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Render(err.to_string())
    }
}
