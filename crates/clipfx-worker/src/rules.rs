//! Anomaly rules over annotation rows.
//!
//! Each rule looks for an annotation pattern that is usually a model
//! mistake rather than a real editing choice:
//!
//! - `sound-conflict`: background music and sound effects both marked present
//! - `overuse:<field>`: an effect count above the configured threshold
//! - `text-conflict`: on-screen text typed as both transcript and specific
//!   keywords
//!
//! Rules are independent and always reported in that order.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use clipfx_models::schema::{columns, OVERUSE_FIELDS};
use clipfx_models::{AnomalyResult, Row, VideoId, TRIGGERED_RULES_COLUMN};
use clipfx_store::{RecordStore, StoreResult};
use tracing::debug;

use crate::config::DEFAULT_OVERUSE_THRESHOLD;

/// On-screen text tags that mean the text is a transcript.
const TRANSCRIPT_TAGS: &[&str] = &["transcript", "text on screen", "text-on-screen"];

/// A rule that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    SoundConflict,
    Overuse(&'static str),
    TextConflict,
}

impl Trigger {
    /// Name written to the anomaly table.
    pub fn name(&self) -> String {
        match self {
            Trigger::SoundConflict => "sound-conflict".to_string(),
            Trigger::Overuse(field) => format!("overuse:{}", field),
            Trigger::TextConflict => "text-conflict".to_string(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Tunables for the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleConfig {
    /// Counts strictly greater than this are overuse
    pub overuse_threshold: i64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            overuse_threshold: DEFAULT_OVERUSE_THRESHOLD,
        }
    }
}

/// Evaluates the anomaly rules.
#[derive(Debug, Clone, Default)]
pub struct AnomalyEngine {
    config: RuleConfig,
}

impl AnomalyEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Rules that fire for one row. Pure; malformed cells read as defaults.
    pub fn evaluate(&self, row: &Row) -> Vec<Trigger> {
        let mut triggers = Vec::new();

        if row.flag(columns::BACKGROUND_MUSIC_PRESENT) && row.flag(columns::SOUND_EFFECTS_PRESENT) {
            triggers.push(Trigger::SoundConflict);
        }

        for field in OVERUSE_FIELDS {
            if row.count(field) > self.config.overuse_threshold {
                triggers.push(Trigger::Overuse(*field));
            }
        }

        if has_text_conflict(row) {
            triggers.push(Trigger::TextConflict);
        }

        triggers
    }

    /// Results for every row with at least one trigger, in table order.
    pub fn scan(&self, store: &RecordStore) -> Vec<AnomalyResult> {
        store
            .rows()
            .iter()
            .filter_map(|row| {
                let names = self.evaluate(row).iter().map(Trigger::name).collect();
                AnomalyResult::new(row.video_id().clone(), names)
            })
            .inspect(|result| {
                debug!(
                    video_id = %result.video_id(),
                    triggers = %result.joined(),
                    "Row flagged"
                )
            })
            .collect()
    }
}

fn has_text_conflict(row: &Row) -> bool {
    // "Transcript/Text on Screen" style tags count as each of their parts.
    let tags: Vec<String> = row
        .tags(columns::TYPE_OF_ON_SCREEN_TEXT)
        .iter()
        .flat_map(|tag| tag.split('/'))
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect();

    let transcript = tags.iter().any(|t| TRANSCRIPT_TAGS.contains(&t.as_str()));
    let keywords = tags
        .iter()
        .any(|t| t.contains("specific") && t.contains("keyword"));

    transcript && keywords
}

/// Build the anomaly table: flagged rows with all input columns plus
/// [`TRIGGERED_RULES_COLUMN`], in input order.
pub fn anomaly_table(store: &RecordStore, results: &[AnomalyResult]) -> StoreResult<RecordStore> {
    let by_id: HashMap<&VideoId, &AnomalyResult> =
        results.iter().map(|r| (r.video_id(), r)).collect();

    let mut headers = store.headers().to_vec();
    if !headers.iter().any(|h| h == TRIGGERED_RULES_COLUMN) {
        headers.push(TRIGGERED_RULES_COLUMN.to_string());
    }
    let mut table = RecordStore::new(headers, store.id_column())?;

    for row in store.rows() {
        if let Some(result) = by_id.get(row.video_id()) {
            let flagged = row
                .clone()
                .with_cell(TRIGGERED_RULES_COLUMN, result.joined());
            table.insert(flagged)?;
        }
    }

    Ok(table)
}

/// Read flagged rows back from an anomaly table.
///
/// Rows whose trigger cell is empty are ignored.
pub async fn read_anomaly_table(path: impl AsRef<Path>) -> StoreResult<Vec<AnomalyResult>> {
    let (table, _) = RecordStore::load(path).await?;
    Ok(table
        .rows()
        .iter()
        .filter_map(|row| {
            AnomalyResult::from_joined(row.video_id().clone(), row.cell(TRIGGERED_RULES_COLUMN))
        })
        .collect())
}
