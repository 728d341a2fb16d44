//! Error types for the project crate (thiserror-based).

use rx_timeline::TimelineError;
use thiserror::Error;

/// Errors that can occur while reading or writing timestamp and config files.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// File I/O error (read, write, rename).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A sync point failed validation.
    #[error("Invalid sync points: {0}")]
    Timeline(#[from] TimelineError),

    #[error("Invalid timestamp file: {reason}")]
    InvalidFile { reason: String },

    /// The path does not exist.
    #[error("File not found: {path}")]
    NotFound { path: String },
}

/// Convenience Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;
