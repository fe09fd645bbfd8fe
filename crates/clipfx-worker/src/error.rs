//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The store could not be persisted after an edit. The review session
    /// stops rather than continue with an unsaved change.
    #[error("Failed to flush record store for video {video_id}: {source}")]
    FlushFailed {
        video_id: String,
        #[source]
        source: clipfx_store::StoreError,
    },

    #[error("Audit log write failed: {0}")]
    AuditFailed(#[source] clipfx_store::StoreError),

    #[error("Store error: {0}")]
    Store(#[from] clipfx_store::StoreError),

    #[error("Media error: {0}")]
    Media(#[from] clipfx_media::MediaError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn flush_failed(video_id: impl Into<String>, source: clipfx_store::StoreError) -> Self {
        Self::FlushFailed {
            video_id: video_id.into(),
            source,
        }
    }

    /// Errors that must halt an interactive session.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WorkerError::FlushFailed { .. } | WorkerError::AuditFailed(_)
        )
    }
}
