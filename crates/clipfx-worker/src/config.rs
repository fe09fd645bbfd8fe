//! Pipeline configuration.

use std::path::PathBuf;

use crate::error::{WorkerError, WorkerResult};
use crate::rules::RuleConfig;

/// Default count above which an effect is considered overused.
pub const DEFAULT_OVERUSE_THRESHOLD: i64 = 5;

/// Default minimum play count for a video to stay in the dataset.
pub const DEFAULT_MINIMUM_VIEWS: u64 = 100_000;

/// Pipeline configuration.
///
/// Every stage works on one genre at a time; the genre only selects file
/// paths below `data_dir`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Genre / category name (e.g. `food`)
    pub genre: String,
    /// Root directory for all per-genre files
    pub data_dir: PathBuf,
    /// Counts strictly above this trigger `overuse:<field>`
    pub overuse_threshold: i64,
    /// Rows with fewer plays are pruned
    pub minimum_views: u64,
    /// Player command line; the desktop opener when unset
    pub player_command: Option<String>,
}

impl PipelineConfig {
    /// Config for a genre with default settings.
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            data_dir: PathBuf::from("."),
            overuse_threshold: DEFAULT_OVERUSE_THRESHOLD,
            minimum_views: DEFAULT_MINIMUM_VIEWS,
            player_command: None,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key lookup. `VIDEO_CATEGORY` is required.
    pub fn from_lookup<F>(lookup: F) -> WorkerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let genre = lookup("VIDEO_CATEGORY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| WorkerError::config_error("Missing VIDEO_CATEGORY"))?;

        Ok(Self {
            genre,
            data_dir: lookup("CLIPFX_DATA_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            overuse_threshold: lookup("OVERUSE_THRESHOLD")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_OVERUSE_THRESHOLD),
            minimum_views: lookup("MINIMUM_VIEWS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_MINIMUM_VIEWS),
            player_command: lookup("PLAYER_COMMAND").filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn rule_config(&self) -> RuleConfig {
        RuleConfig {
            overuse_threshold: self.overuse_threshold,
        }
    }

    /// `filtered/<genre>_filtered.csv`
    pub fn filtered_csv(&self) -> PathBuf {
        self.data_dir
            .join("filtered")
            .join(format!("{}_filtered.csv", self.genre))
    }

    /// `kept_<genre>_videos/`
    pub fn media_dir(&self) -> PathBuf {
        self.data_dir.join(format!("kept_{}_videos", self.genre))
    }

    /// `anomalies/<genre>_anomalies.csv`
    pub fn anomalies_csv(&self) -> PathBuf {
        self.data_dir
            .join("anomalies")
            .join(format!("{}_anomalies.csv", self.genre))
    }

    /// `backups/<genre>/`
    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join("backups").join(&self.genre)
    }

    pub fn edits_log(&self) -> PathBuf {
        self.data_dir.join("edits_log.jsonl")
    }

    /// Table the review session writes corrected rows to.
    pub fn updated_csv(&self) -> PathBuf {
        self.data_dir.join("updated_videos.csv")
    }
}
