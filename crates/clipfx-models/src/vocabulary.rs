//! Closed vocabularies for enumerated annotation fields.
//!
//! Every vocabulary value has two spellings:
//! - a symbolic NAME (`SPECIFICKEYWORDS`) that operators type during review
//! - a label (`Specific Keywords`) that the analysis model returns and the
//!   CSV stores
//!
//! Parsing accepts either spelling, case-insensitively; storing always uses
//! the label.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for a value outside a closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {vocabulary} value: {value}")]
pub struct VocabularyError {
    pub vocabulary: &'static str,
    pub value: String,
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $title:literal {
            $($variant:ident => ($symbol:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Symbolic NAME typed by operators.
            pub fn symbol(&self) -> &'static str {
                match self {
                    $($name::$variant => $symbol),+
                }
            }

            /// Label stored in the CSV.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl FromStr for $name {
            type Err = VocabularyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.symbol().eq_ignore_ascii_case(s) || v.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| VocabularyError {
                        vocabulary: $title,
                        value: s.to_string(),
                    })
            }
        }
    };
}

vocabulary! {
    /// How the video was shot.
    CameraAngle, "camera angle" {
        SingleAngle => ("SINGLEANGLE", "Single Static Angle"),
        MultipleAngle => ("MULTIPLEANGLE", "Multiple Static Angle"),
        Dynamic => ("DYNAMIC", "Dynamic Camera Movement"),
    }
}

vocabulary! {
    /// Overall format of the video.
    OverallType, "overall type" {
        Montage => ("MONTAGE", "Montage"),
        MovieClip => ("MOVIECLIP", "Movie"),
        Pov => ("POV", "POV"),
        TalkingHead => ("TALKINGHEAD", "Talking Head"),
        Vlog => ("VLOG", "Vlog"),
        TextOverlay => ("TEXTOVERLAY", "Text Overlay"),
        Interview => ("INTERVIEW", "Interview"),
        Animated => ("ANIMATED", "Animated"),
        HowTo => ("HOWTO", "How-to"),
        TrendingAudio => ("TRENDINGAUDIO", "Trending Audio"),
    }
}

vocabulary! {
    /// Purpose of on-screen text.
    TextType, "on-screen text type" {
        CallToAction => ("CTA", "Call to Action"),
        Transcript => ("TRANSCRIPT", "Transcript"),
        Hook => ("HOOK", "Hook"),
        SpecificKeywords => ("SPECIFICKEYWORDS", "Specific Keywords"),
    }
}

vocabulary! {
    /// Transition effect between clips.
    TransitionType, "transition" {
        Fade => ("FADE_TRANSITION", "Fade Transition"),
        Slide => ("SLIDE_TRANSITION", "Slide Transition"),
        Wipe => ("WIPE_TRANSITION", "Wipe Transition"),
        Flip => ("FLIP_TRANSITION", "Flip Transition"),
        Clockwipe => ("CLOCKWIPE_TRANSITION", "Clockwipe Transition"),
        Iris => ("IRIS_TRANSITION", "Iris Transition"),
        Zoom => ("ZOOM_TRANSITION", "Zoom Transition"),
    }
}

vocabulary! {
    /// Platform content category (one dataset per category).
    Category, "category" {
        Singing => ("SINGING", "Singing & Dancing"),
        Comedy => ("COMEDY", "Comedy"),
        Sports => ("SPORTS", "Sports"),
        AnimeAndComics => ("ANIMEANDCOMICS", "Anime & Comics"),
        Relationship => ("RELATIONSHIP", "Relationship"),
        Shows => ("SHOWS", "Shows"),
        Lipsync => ("LIPSYNC", "Lipsync"),
        DailyLife => ("DAILYLIFE", "Daily Life"),
        BeautyCare => ("BEAUTYCARE", "Beauty Care"),
        Games => ("GAMES", "Games"),
        Society => ("SOCIETY", "Society"),
        Outfit => ("OUTFIT", "Outfit"),
        Cars => ("CARS", "Cars"),
        Food => ("FOOD", "Food"),
        Animals => ("ANIMALS", "Animals"),
        Family => ("FAMILY", "Family"),
        Drama => ("DRAMA", "Drama"),
        FitnessAndHealth => ("FITNESSANDHEALTH", "Fitness & Health"),
        Education => ("EDUCATION", "Education"),
        Technology => ("TECHNOLOGY", "Technology"),
    }
}

vocabulary! {
    /// Playback speed relative to real time.
    PlaybackSpeed, "playback speed" {
        Increased => ("INCREASED", "Increased"),
        Normal => ("NORMAL", "Normal"),
        Slowed => ("SLOWED", "Slowed"),
    }
}

vocabulary! {
    /// Kind of B-roll insert.
    BrollType, "b-roll type" {
        Video => ("VIDEO", "video"),
        Image => ("IMAGE", "image"),
    }
}

vocabulary! {
    /// Kind of animated graphic.
    AnimatedGraphicsType, "animated graphics type" {
        Gif => ("GIF", "GIF"),
        Sticker => ("STICKER", "STICKER"),
        Clip => ("CLIP", "CLIP"),
        Meme => ("MEME", "MEME"),
        Emoji => ("EMOJI", "EMOJI"),
    }
}

/// Selector for one of the closed vocabularies, used by the field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    CameraAngle,
    OverallType,
    TextType,
    Transition,
    Category,
    PlaybackSpeed,
    BrollType,
    AnimatedGraphics,
}

impl Vocabulary {
    /// `(symbol, label)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, &'static str)> {
        fn pairs<T: Copy>(
            all: &[T],
            symbol: fn(&T) -> &'static str,
            label: fn(&T) -> &'static str,
        ) -> Vec<(&'static str, &'static str)> {
            all.iter().map(|v| (symbol(v), label(v))).collect()
        }

        match self {
            Vocabulary::CameraAngle => pairs(CameraAngle::ALL, CameraAngle::symbol, CameraAngle::label),
            Vocabulary::OverallType => pairs(OverallType::ALL, OverallType::symbol, OverallType::label),
            Vocabulary::TextType => pairs(TextType::ALL, TextType::symbol, TextType::label),
            Vocabulary::Transition => {
                pairs(TransitionType::ALL, TransitionType::symbol, TransitionType::label)
            }
            Vocabulary::Category => pairs(Category::ALL, Category::symbol, Category::label),
            Vocabulary::PlaybackSpeed => {
                pairs(PlaybackSpeed::ALL, PlaybackSpeed::symbol, PlaybackSpeed::label)
            }
            Vocabulary::BrollType => pairs(BrollType::ALL, BrollType::symbol, BrollType::label),
            Vocabulary::AnimatedGraphics => pairs(
                AnimatedGraphicsType::ALL,
                AnimatedGraphicsType::symbol,
                AnimatedGraphicsType::label,
            ),
        }
    }

    /// Symbolic names, for operator prompts.
    pub fn symbols(&self) -> Vec<&'static str> {
        self.entries().into_iter().map(|(symbol, _)| symbol).collect()
    }

    /// Resolve a symbol or label (case-insensitive) to the stored label.
    pub fn resolve(&self, input: &str) -> Option<&'static str> {
        let input = input.trim();
        self.entries()
            .into_iter()
            .find(|(symbol, label)| {
                symbol.eq_ignore_ascii_case(input) || label.eq_ignore_ascii_case(input)
            })
            .map(|(_, label)| label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_symbol_or_label() {
        assert_eq!("cta".parse::<TextType>().unwrap(), TextType::CallToAction);
        assert_eq!(
            "specific keywords".parse::<TextType>().unwrap(),
            TextType::SpecificKeywords
        );
        assert_eq!(
            "ZOOM_TRANSITION".parse::<TransitionType>().unwrap(),
            TransitionType::Zoom
        );
        let err = "subtitles".parse::<TextType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown on-screen text type value: subtitles");
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Category::FitnessAndHealth).unwrap();
        assert_eq!(json, "\"Fitness & Health\"");
        let parsed: OverallType = serde_json::from_str("\"How-to\"").unwrap();
        assert_eq!(parsed, OverallType::HowTo);
    }

    #[test]
    fn test_vocabulary_resolve() {
        assert_eq!(Vocabulary::BrollType.resolve("VIDEO"), Some("video"));
        assert_eq!(Vocabulary::TextType.resolve("hook"), Some("Hook"));
        assert_eq!(Vocabulary::AnimatedGraphics.resolve("gif"), Some("GIF"));
        assert_eq!(Vocabulary::PlaybackSpeed.resolve("fast"), None);
    }

    #[test]
    fn test_symbols_follow_declaration_order() {
        assert_eq!(
            Vocabulary::TextType.symbols(),
            vec!["CTA", "TRANSCRIPT", "HOOK", "SPECIFICKEYWORDS"]
        );
        assert_eq!(Vocabulary::Category.entries().len(), 20);
    }
}
