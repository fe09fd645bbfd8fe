//! Audit log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;
use crate::video::VideoId;

/// One correction applied by an operator. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEntry {
    /// Row that was changed
    pub video_id: VideoId,
    /// Column that was changed
    pub field: String,
    /// Normalized value before the change
    pub old_value: FieldValue,
    /// Value after the change
    pub new_value: FieldValue,
    /// When the change was accepted
    pub timestamp: DateTime<Utc>,
}

impl EditEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        video_id: VideoId,
        field: impl Into<String>,
        old_value: FieldValue,
        new_value: FieldValue,
    ) -> Self {
        Self {
            video_id,
            field: field.into(),
            old_value,
            new_value,
            timestamp: Utc::now(),
        }
    }
}
