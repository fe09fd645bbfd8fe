//! Column names and the editable field schema.

use crate::vocabulary::Vocabulary;

/// Column names written by the analysis stage.
pub mod columns {
    pub const VIDEO_ID: &str = "video_id";
    pub const VIDEO_PLAYCOUNT: &str = "video_playcount";
    pub const VIDEO_SUMMARY: &str = "video_summary";
    pub const EDITED_SCRIPT: &str = "edited script";

    pub const SHOT_OR_SCENE_CHANGES_PRESENT: &str = "shot_or_scene_changes_present";
    pub const B_ROLL_FOOTAGE_PRESENT: &str = "b_roll_footage_present";
    pub const ANIMATED_GRAPHICS_PRESENT: &str = "animated_graphics_present";
    pub const ON_SCREEN_TEXT_PRESENT: &str = "on_screen_text_present";
    pub const TRANSITIONS_PRESENT: &str = "transitions_present";
    pub const VOICEOVER_PRESENT: &str = "voiceover_present";
    pub const BACKGROUND_MUSIC_PRESENT: &str = "background_music_present";
    pub const SOUND_EFFECTS_PRESENT: &str = "sound_effects_present";

    pub const SHOT_OR_SCENE_CHANGE_COUNT: &str = "shot_or_scene_change_count";
    pub const AVERAGE_INTERVAL_SECONDS: &str = "average_interval_shot_or_scene_changes_seconds";
    pub const B_ROLL_COUNT: &str = "b_roll_count";
    pub const B_ROLL_VISUALS: &str = "b_roll_visuals";
    pub const ANIMATED_GRAPHICS_COUNT: &str = "animated_graphics_count";
    pub const TYPES_OF_ANIMATED_GRAPHICS: &str = "types_of_animated_graphics";
    pub const TYPE_OF_ON_SCREEN_TEXT: &str = "type_of_on_screen_text";
    pub const TRANSITIONS_COUNT: &str = "transitions_count";
    pub const TYPES_OF_TRANSITIONS: &str = "types_of_transitions";
    pub const VOICEOVER_TYPE: &str = "voiceover_type";
    pub const SOUND_EFFECTS_COUNT: &str = "sound_effects_count";
    pub const SOUND_EFFECTS_TYPE: &str = "sound_effects_type";

    pub const CAMERA_ANGLES: &str = "camera_angles";
    pub const OVERALL_TYPE: &str = "overall_type";
    pub const PLAYBACK_SPEED: &str = "playback_speed";
    pub const CATEGORY: &str = "category";
}

use columns::*;

/// Header names recognized as the video ID column, in priority order.
pub const ID_COLUMN_CANDIDATES: &[&str] =
    &["video_id", "id", "videoId", "videoID", "video_key", "videoKey"];

/// Presence flags that count as a visible editing effect.
pub const EFFECT_FLAGS: &[&str] = &[
    TRANSITIONS_PRESENT,
    B_ROLL_FOOTAGE_PRESENT,
    ANIMATED_GRAPHICS_PRESENT,
    ON_SCREEN_TEXT_PRESENT,
];

/// Count fields checked for overuse.
pub const OVERUSE_FIELDS: &[&str] = &[
    B_ROLL_COUNT,
    ANIMATED_GRAPHICS_COUNT,
    TRANSITIONS_COUNT,
    SOUND_EFFECTS_COUNT,
];

/// How a field's cell is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Presence flag (truthy vocabulary)
    Flag,
    /// Non-negative integer
    Count,
    /// Non-negative float
    Seconds,
    /// Free text
    Text,
    /// One value from a closed vocabulary
    Choice(Vocabulary),
    /// Comma-separated values from a closed vocabulary
    Tags(Vocabulary),
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Flag => "flag",
            FieldKind::Count => "count",
            FieldKind::Seconds => "seconds",
            FieldKind::Text => "text",
            FieldKind::Choice(_) => "choice",
            FieldKind::Tags(_) => "tags",
        }
    }
}

/// A field the review session may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableField {
    /// Column name
    pub name: &'static str,
    /// Cell type
    pub kind: FieldKind,
    /// Presence flag gating this field; cleared when the flag goes false
    pub parent: Option<&'static str>,
}

const fn flag(name: &'static str) -> EditableField {
    EditableField {
        name,
        kind: FieldKind::Flag,
        parent: None,
    }
}

const fn dependent(name: &'static str, kind: FieldKind, parent: &'static str) -> EditableField {
    EditableField {
        name,
        kind,
        parent: Some(parent),
    }
}

const fn choice(name: &'static str, vocabulary: Vocabulary) -> EditableField {
    EditableField {
        name,
        kind: FieldKind::Choice(vocabulary),
        parent: None,
    }
}

/// Fields offered during review, in prompt order.
///
/// Presence flags come first so that dependents are only offered once the
/// operator has settled whether their effect exists.
pub const EDITABLE_FIELDS: &[EditableField] = &[
    flag(SHOT_OR_SCENE_CHANGES_PRESENT),
    flag(B_ROLL_FOOTAGE_PRESENT),
    flag(ANIMATED_GRAPHICS_PRESENT),
    flag(ON_SCREEN_TEXT_PRESENT),
    flag(TRANSITIONS_PRESENT),
    flag(VOICEOVER_PRESENT),
    flag(BACKGROUND_MUSIC_PRESENT),
    flag(SOUND_EFFECTS_PRESENT),
    dependent(SHOT_OR_SCENE_CHANGE_COUNT, FieldKind::Count, SHOT_OR_SCENE_CHANGES_PRESENT),
    dependent(AVERAGE_INTERVAL_SECONDS, FieldKind::Seconds, SHOT_OR_SCENE_CHANGES_PRESENT),
    dependent(B_ROLL_COUNT, FieldKind::Count, B_ROLL_FOOTAGE_PRESENT),
    dependent(
        B_ROLL_VISUALS,
        FieldKind::Tags(Vocabulary::BrollType),
        B_ROLL_FOOTAGE_PRESENT,
    ),
    dependent(ANIMATED_GRAPHICS_COUNT, FieldKind::Count, ANIMATED_GRAPHICS_PRESENT),
    dependent(
        TYPES_OF_ANIMATED_GRAPHICS,
        FieldKind::Tags(Vocabulary::AnimatedGraphics),
        ANIMATED_GRAPHICS_PRESENT,
    ),
    dependent(
        TYPE_OF_ON_SCREEN_TEXT,
        FieldKind::Tags(Vocabulary::TextType),
        ON_SCREEN_TEXT_PRESENT,
    ),
    dependent(TRANSITIONS_COUNT, FieldKind::Count, TRANSITIONS_PRESENT),
    dependent(
        TYPES_OF_TRANSITIONS,
        FieldKind::Tags(Vocabulary::Transition),
        TRANSITIONS_PRESENT,
    ),
    dependent(VOICEOVER_TYPE, FieldKind::Text, VOICEOVER_PRESENT),
    dependent(SOUND_EFFECTS_COUNT, FieldKind::Count, SOUND_EFFECTS_PRESENT),
    dependent(SOUND_EFFECTS_TYPE, FieldKind::Text, SOUND_EFFECTS_PRESENT),
    choice(CAMERA_ANGLES, Vocabulary::CameraAngle),
    choice(OVERALL_TYPE, Vocabulary::OverallType),
    choice(PLAYBACK_SPEED, Vocabulary::PlaybackSpeed),
];

/// Look up an editable field by column name.
pub fn editable_field(name: &str) -> Option<&'static EditableField> {
    EDITABLE_FIELDS.iter().find(|f| f.name == name)
}

/// Fields gated by a presence flag.
pub fn dependents_of(flag: &str) -> impl Iterator<Item = &'static EditableField> + '_ {
    EDITABLE_FIELDS
        .iter()
        .filter(move |f| f.parent == Some(flag))
}
