//! Cross-check of annotations against the tagged edited script.
//!
//! The edited script marks effects inline (`[BROLL]...[/BROLL]`,
//! `[TRANSITION]`, ...). Only start tags are counted.

use serde::Serialize;
use serde_json::Value;

use clipfx_models::schema::columns;
use clipfx_models::{Row, VideoId};
use clipfx_store::RecordStore;

/// How an effect's annotation is compared to the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Count column vs number of start tags
    Count(&'static str),
    /// Presence flag vs at least one start tag
    Presence(&'static str),
}

/// An effect tag checked against the annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectTag {
    /// Short effect name used in the report
    pub effect: &'static str,
    /// Literal start tag
    pub tag: &'static str,
    pub expectation: Expectation,
}

pub const EFFECT_TAGS: &[EffectTag] = &[
    EffectTag {
        effect: "b_roll",
        tag: "[BROLL]",
        expectation: Expectation::Count(columns::B_ROLL_COUNT),
    },
    EffectTag {
        effect: "animated",
        tag: "[ANIMATED]",
        expectation: Expectation::Count(columns::ANIMATED_GRAPHICS_COUNT),
    },
    EffectTag {
        effect: "tos",
        tag: "[TOS]",
        expectation: Expectation::Presence(columns::ON_SCREEN_TEXT_PRESENT),
    },
    EffectTag {
        effect: "transition",
        tag: "[TRANSITION]",
        expectation: Expectation::Presence(columns::TRANSITIONS_PRESENT),
    },
    EffectTag {
        effect: "sound_effect",
        tag: "[SOUND_EFFECT]",
        expectation: Expectation::Presence(columns::SOUND_EFFECTS_PRESENT),
    },
    EffectTag {
        effect: "background_music",
        tag: "[BACKGROUND_MUSIC]",
        expectation: Expectation::Presence(columns::BACKGROUND_MUSIC_PRESENT),
    },
];

/// Annotated vs placed value for one effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Difference {
    Count { annotated: i64, placed: usize },
    Presence { annotated: bool, placed: bool },
}

/// One effect that disagrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectMismatch {
    pub effect: &'static str,
    #[serde(flatten)]
    pub difference: Difference,
}

/// All disagreements for one row. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismatchReport {
    pub video_id: VideoId,
    pub mismatches: Vec<EffectMismatch>,
}

/// Searchable text of an edited script: every segment's `transcript` and
/// `visualDescription`, space-joined.
///
/// Accepts a JSON list of segments or an object with a `segments` list.
/// Single-quoted input is retried with double quotes. Anything else reads
/// as empty text.
pub fn script_text(cell: &str) -> String {
    let raw = cell.trim();
    if raw.is_empty() {
        return String::new();
    }

    let parsed = serde_json::from_str::<Value>(raw)
        .or_else(|_| serde_json::from_str::<Value>(&raw.replace('\'', "\"")));
    let Ok(mut parsed) = parsed else {
        return String::new();
    };

    if let Some(segments) = parsed.get_mut("segments") {
        parsed = segments.take();
    }
    let Value::Array(segments) = parsed else {
        return String::new();
    };

    let mut parts = Vec::new();
    for segment in &segments {
        for key in ["transcript", "visualDescription"] {
            match segment.get(key) {
                Some(Value::String(s)) if !s.is_empty() => parts.push(s.clone()),
                Some(Value::Null) | Some(Value::String(_)) | None => {}
                Some(other) => parts.push(other.to_string()),
            }
        }
    }
    parts.join(" ").trim().to_string()
}

/// Compare one row's annotations with its edited script.
pub fn check_row(row: &Row) -> Option<MismatchReport> {
    let text = script_text(row.cell(columns::EDITED_SCRIPT));

    let mismatches: Vec<EffectMismatch> = EFFECT_TAGS
        .iter()
        .filter_map(|effect| {
            let placed = text.matches(effect.tag).count();
            let difference = match effect.expectation {
                Expectation::Count(column) => {
                    let annotated = row.count(column);
                    (annotated != placed as i64).then_some(Difference::Count { annotated, placed })
                }
                Expectation::Presence(column) => {
                    let annotated = row.flag(column);
                    let placed = placed > 0;
                    (annotated != placed).then_some(Difference::Presence { annotated, placed })
                }
            }?;
            Some(EffectMismatch {
                effect: effect.effect,
                difference,
            })
        })
        .collect();

    if mismatches.is_empty() {
        None
    } else {
        Some(MismatchReport {
            video_id: row.video_id().clone(),
            mismatches,
        })
    }
}

/// Reports for every row with at least one mismatch, in table order.
pub fn find_mismatches(store: &RecordStore) -> Vec<MismatchReport> {
    store.rows().iter().filter_map(check_row).collect()
}
