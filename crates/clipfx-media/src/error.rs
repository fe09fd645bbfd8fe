//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while handling media files.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Video player not found in PATH: {0}")]
    PlayerNotFound(String),

    #[error("Video player failed: {0}")]
    PlayerFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a player failure error.
    pub fn player_failed(message: impl Into<String>) -> Self {
        Self::PlayerFailed(message.into())
    }
}
