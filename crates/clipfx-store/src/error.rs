//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table has no header row: {0}")]
    MissingHeader(PathBuf),

    #[error("No video ID column found (looked for {0})")]
    MissingIdColumn(String),

    #[error("Required column missing: {0}")]
    MissingColumn(String),

    #[error("Video not found in store: {0}")]
    UnknownVideo(String),

    #[error("Duplicate video ID: {0}")]
    DuplicateVideo(String),

    #[error("Column appears more than once in header: {0}")]
    DuplicateColumn(String),

    #[error("Column cannot be edited: {0}")]
    ProtectedColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn(name.into())
    }

    pub fn unknown_video(id: impl Into<String>) -> Self {
        Self::UnknownVideo(id.into())
    }
}
