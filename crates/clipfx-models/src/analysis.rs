//! Annotation record produced by the analysis stage.
//!
//! [`VideoEditAnalysis`] is the structured response the analysis stage asks
//! the model for; its JSON schema is what gets sent as the response schema.
//! After a review edit, [`validate_row`] checks the row against the same
//! shape and reports problems as warnings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::row::Row;
use crate::schema::{columns, FieldKind, EDITABLE_FIELDS};
use crate::vocabulary::{
    AnimatedGraphicsType, BrollType, CameraAngle, Category, OverallType, PlaybackSpeed, TextType,
    TransitionType,
};

/// Editing-effect annotation for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoEditAnalysis {
    pub video_summary: String,
    pub category: Category,
    pub overall_type: OverallType,
    pub camera_angles: CameraAngle,
    pub shot_or_scene_changes_present: bool,
    pub average_interval_shot_or_scene_changes_seconds: f64,
    pub shot_or_scene_change_count: u32,
    pub b_roll_footage_present: bool,
    pub b_roll_visuals: Vec<BrollType>,
    pub b_roll_count: u32,
    pub animated_graphics_present: bool,
    pub types_of_animated_graphics: Vec<AnimatedGraphicsType>,
    pub animated_graphics_count: u32,
    pub on_screen_text_present: bool,
    pub type_of_on_screen_text: Vec<TextType>,
    pub transitions_present: bool,
    pub types_of_transitions: Vec<TransitionType>,
    pub transitions_count: u32,
    pub voiceover_present: bool,
    pub voiceover_type: String,
    pub playback_speed: PlaybackSpeed,
    pub background_music_present: bool,
    pub sound_effects_present: bool,
    pub sound_effects_type: String,
    pub sound_effects_count: u32,
}

impl VideoEditAnalysis {
    /// Pretty-printed JSON schema of the record.
    pub fn schema_json() -> serde_json::Result<String> {
        let schema = schemars::schema_for!(VideoEditAnalysis);
        serde_json::to_string_pretty(&schema)
    }
}

/// Check a row's editable cells against the annotation record's types.
///
/// Returns one message per problem; an empty list means the row is clean.
/// Blank cells are not reported since the table treats them as defaults.
pub fn validate_row(row: &Row) -> Vec<String> {
    let mut problems = Vec::new();

    for field in EDITABLE_FIELDS {
        let raw = row.cell(field.name).trim();
        if raw.is_empty() {
            continue;
        }

        match field.kind {
            FieldKind::Flag | FieldKind::Text => {}
            FieldKind::Count => {
                let n = raw.parse::<f64>();
                if !matches!(n, Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0) {
                    problems.push(format!("{}: expected a non-negative integer, got {:?}", field.name, raw));
                }
            }
            FieldKind::Seconds => {
                if !matches!(raw.parse::<f64>(), Ok(v) if v.is_finite() && v >= 0.0) {
                    problems.push(format!("{}: expected non-negative seconds, got {:?}", field.name, raw));
                }
            }
            FieldKind::Choice(vocabulary) => {
                if vocabulary.resolve(raw).is_none() {
                    problems.push(format!("{}: unknown value {:?}", field.name, raw));
                }
            }
            FieldKind::Tags(vocabulary) => {
                for tag in row.tags(field.name) {
                    if vocabulary.resolve(&tag).is_none() {
                        problems.push(format!("{}: unknown tag {:?}", field.name, tag));
                    }
                }
            }
        }
    }

    let category = row.cell(columns::CATEGORY).trim();
    if !category.is_empty() && category.parse::<Category>().is_err() {
        problems.push(format!("{}: unknown value {:?}", columns::CATEGORY, category));
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::columns::*;
    use crate::video::VideoId;

    #[test]
    fn test_schema_lists_labels() {
        let schema = VideoEditAnalysis::schema_json().unwrap();
        assert!(schema.contains("\"VideoEditAnalysis\""));
        assert!(schema.contains("Specific Keywords"));
        assert!(schema.contains("type_of_on_screen_text"));
    }

    #[test]
    fn test_deserializes_model_response() {
        let json = r#"{
            "video_summary": "A chef plates pasta.",
            "category": "Food",
            "overall_type": "How-to",
            "camera_angles": "Multiple Static Angle",
            "shot_or_scene_changes_present": true,
            "average_interval_shot_or_scene_changes_seconds": 2.5,
            "shot_or_scene_change_count": 8,
            "b_roll_footage_present": false,
            "b_roll_visuals": [],
            "b_roll_count": 0,
            "animated_graphics_present": false,
            "types_of_animated_graphics": [],
            "animated_graphics_count": 0,
            "on_screen_text_present": true,
            "type_of_on_screen_text": ["Hook", "Call to Action"],
            "transitions_present": false,
            "types_of_transitions": [],
            "transitions_count": 0,
            "voiceover_present": true,
            "voiceover_type": "narrating",
            "playback_speed": "Normal",
            "background_music_present": true,
            "sound_effects_present": false,
            "sound_effects_type": "",
            "sound_effects_count": 0
        }"#;
        let analysis: VideoEditAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.category, Category::Food);
        assert_eq!(
            analysis.type_of_on_screen_text,
            vec![TextType::Hook, TextType::CallToAction]
        );
    }

    #[test]
    fn test_validate_row_reports_problems() {
        let row = Row::new(VideoId::from("1"))
            .with_cell(B_ROLL_COUNT, "-2")
            .with_cell(TYPE_OF_ON_SCREEN_TEXT, "Hook, Subtitles")
            .with_cell(PLAYBACK_SPEED, "Fast")
            .with_cell(CATEGORY, "Food");

        let problems = validate_row(&row);
        assert_eq!(problems.len(), 3, "{problems:?}");
        assert!(problems[0].starts_with("b_roll_count"));
        assert!(problems.iter().any(|p| p.contains("Subtitles")));
        assert!(problems.iter().any(|p| p.starts_with("playback_speed")));
    }

    #[test]
    fn test_validate_row_accepts_clean_row() {
        let row = Row::new(VideoId::from("1"))
            .with_cell(TRANSITIONS_COUNT, "3.0")
            .with_cell(TYPES_OF_TRANSITIONS, "Fade Transition, Zoom Transition")
            .with_cell(CAMERA_ANGLES, "Dynamic Camera Movement");
        assert!(validate_row(&row).is_empty());
    }
}
