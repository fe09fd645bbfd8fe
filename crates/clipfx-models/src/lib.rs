//! Shared data models for the ClipFX dataset pipeline.
//!
//! This crate provides:
//! - Video rows keyed by [`VideoId`] and their typed cell values
//! - The truthy/list normalizer used to read annotation cells
//! - Closed vocabularies for enumerated annotation fields
//! - The editable field schema used by the review session
//! - Anomaly results and audit log entries
//! - The annotation record requested from the analysis model

pub mod analysis;
pub mod anomaly;
pub mod edit;
pub mod normalize;
pub mod row;
pub mod schema;
pub mod value;
pub mod video;
pub mod vocabulary;

// Re-export common types
pub use analysis::{validate_row, VideoEditAnalysis};
pub use anomaly::{AnomalyResult, TRIGGERED_RULES_COLUMN, TRIGGER_DELIMITER};
pub use edit::EditEntry;
pub use normalize::{join_list, parse_list_like, to_bool, to_count, to_seconds};
pub use row::Row;
pub use schema::{EditableField, FieldKind, EDITABLE_FIELDS};
pub use value::FieldValue;
pub use video::VideoId;
pub use vocabulary::{
    AnimatedGraphicsType, BrollType, CameraAngle, Category, OverallType, PlaybackSpeed, TextType,
    TransitionType, Vocabulary, VocabularyError,
};
