//! Media directory handling for the dataset pipeline.
//!
//! This crate provides:
//! - Recursive scanning of a per-genre video directory
//! - Matching a video ID to its file (exact stem, then substring)
//! - Best-effort deletion of files belonging to pruned rows
//! - Launching an external player for operator review

pub mod error;
pub mod library;
pub mod naming;
pub mod player;

pub use error::{MediaError, MediaResult};
pub use library::{DeletionOutcome, MediaLibrary, MediaMatch, PruneReport, VIDEO_EXTENSIONS};
pub use naming::extract_video_id;
pub use player::{ExternalPlayer, VideoPlayer};
