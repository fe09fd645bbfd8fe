//! Anomaly results.

use serde::{Deserialize, Serialize};

use crate::video::VideoId;

/// Column appended to the anomaly table.
pub const TRIGGERED_RULES_COLUMN: &str = "triggered_rules";

/// Separator between rule names in [`TRIGGERED_RULES_COLUMN`].
pub const TRIGGER_DELIMITER: &str = "; ";

/// Rules that fired for one row. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyResult {
    video_id: VideoId,
    triggers: Vec<String>,
}

impl AnomalyResult {
    /// Build a result; `None` when no rule fired.
    pub fn new(video_id: VideoId, triggers: Vec<String>) -> Option<Self> {
        if triggers.is_empty() {
            None
        } else {
            Some(Self { video_id, triggers })
        }
    }

    /// Rebuild a result from an anomaly table cell.
    pub fn from_joined(video_id: VideoId, joined: &str) -> Option<Self> {
        let triggers = joined
            .split(TRIGGER_DELIMITER.trim())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Self::new(video_id, triggers)
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// Rule names joined for the anomaly table.
    pub fn joined(&self) -> String {
        self.triggers.join(TRIGGER_DELIMITER)
    }
}
