//! Parsing of operator input.
//!
//! All functions here are pure; invalid input yields an [`InputError`] whose
//! message is shown to the operator before re-prompting.

use clipfx_models::normalize::{FALSY, TRUTHY};
use clipfx_models::{EditableField, FieldKind, FieldValue, Vocabulary};
use thiserror::Error;

use super::state::ReviewEvent;

/// Answer that clears a tag list or text field.
pub const CLEAR_KEYWORD: &str = "none";

/// Row-level command typed while a row is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Continue,
    Skip,
    Quit,
}

impl From<Command> for ReviewEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Continue => ReviewEvent::Continue,
            Command::Skip => ReviewEvent::Skip,
            Command::Quit => ReviewEvent::Quit,
        }
    }
}

/// Parse a row command. `None` means the input was not understood.
pub fn parse_command(input: &str) -> Option<Command> {
    match input.trim().to_lowercase().as_str() {
        "" | "e" => Some(Command::Continue),
        "c" | "s" | "skip" => Some(Command::Skip),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("not understood as yes/no: {0:?}")]
    NotBoolean(String),

    #[error("expected a non-negative whole number, got {0:?}")]
    NotCount(String),

    #[error("expected a non-negative number of seconds, got {0:?}")]
    NotSeconds(String),

    #[error("unknown name(s) {names:?}; choose from {choices}")]
    UnknownNames { names: Vec<String>, choices: String },

    #[error("expected exactly one name; choose from {0}")]
    ExpectedOne(String),
}

/// Parse an answer for one field.
///
/// Returns `Ok(None)` for an empty answer (keep the current value).
pub fn parse_field_input(kind: FieldKind, input: &str) -> Result<Option<FieldValue>, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let value = match kind {
        FieldKind::Flag => FieldValue::Flag(parse_bool(input)?),
        FieldKind::Count => FieldValue::Count(
            input
                .parse::<i64>()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| InputError::NotCount(input.to_string()))?,
        ),
        FieldKind::Seconds => FieldValue::Seconds(
            input
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s >= 0.0)
                .ok_or_else(|| InputError::NotSeconds(input.to_string()))?,
        ),
        FieldKind::Text if input.eq_ignore_ascii_case(CLEAR_KEYWORD) => {
            FieldValue::Text(String::new())
        }
        FieldKind::Text => FieldValue::Text(input.to_string()),
        FieldKind::Tags(_) if input.eq_ignore_ascii_case(CLEAR_KEYWORD) => {
            FieldValue::Tags(Vec::new())
        }
        FieldKind::Tags(vocabulary) => FieldValue::Tags(resolve_names(vocabulary, input)?),
        FieldKind::Choice(vocabulary) => {
            let mut labels = resolve_names(vocabulary, input)?;
            if labels.len() != 1 {
                return Err(InputError::ExpectedOne(choices(vocabulary)));
            }
            FieldValue::Text(labels.remove(0))
        }
    };
    Ok(Some(value))
}

fn parse_bool(input: &str) -> Result<bool, InputError> {
    let lowered = input.to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(InputError::NotBoolean(input.to_string()))
    }
}

/// Resolve comma-separated names to stored labels. Any unknown name
/// rejects the whole answer. Repeated names are kept once.
fn resolve_names(vocabulary: Vocabulary, input: &str) -> Result<Vec<String>, InputError> {
    let mut labels: Vec<String> = Vec::new();
    let mut unknown = Vec::new();

    for name in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match vocabulary.resolve(name) {
            Some(label) if !labels.iter().any(|l| l == label) => labels.push(label.to_string()),
            Some(_) => {}
            None => unknown.push(name.to_string()),
        }
    }

    if unknown.is_empty() {
        Ok(labels)
    } else {
        Err(InputError::UnknownNames {
            names: unknown,
            choices: choices(vocabulary),
        })
    }
}

fn choices(vocabulary: Vocabulary) -> String {
    vocabulary.symbols().join(", ")
}

/// Prompt line for a field, showing its current value and accepted input.
pub fn field_prompt(field: &EditableField, current: &FieldValue) -> String {
    let hint = match field.kind {
        FieldKind::Flag => "y/n".to_string(),
        FieldKind::Count => "whole number".to_string(),
        FieldKind::Seconds => "seconds".to_string(),
        FieldKind::Text => format!("text, '{}' clears", CLEAR_KEYWORD),
        FieldKind::Choice(vocabulary) => format!("one of {}", choices(vocabulary)),
        FieldKind::Tags(vocabulary) => format!(
            "comma-separated names from {}, '{}' clears",
            choices(vocabulary),
            CLEAR_KEYWORD
        ),
    };
    format!("{} [current={}] ({}; Enter=keep): ", field.name, current, hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipfx_models::schema::editable_field;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(""), Some(Command::Continue));
        assert_eq!(parse_command(" E "), Some(Command::Continue));
        assert_eq!(parse_command("c"), Some(Command::Skip));
        assert_eq!(parse_command("SKIP"), Some(Command::Skip));
        assert_eq!(parse_command("s"), Some(Command::Skip));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("edit please"), None);
    }

    #[test]
    fn test_booleans() {
        for yes in ["true", "True", "1", "yes", "Y", "t"] {
            assert_eq!(
                parse_field_input(FieldKind::Flag, yes),
                Ok(Some(FieldValue::Flag(true)))
            );
        }
        for no in ["false", "0", "NO", "n", "f"] {
            assert_eq!(
                parse_field_input(FieldKind::Flag, no),
                Ok(Some(FieldValue::Flag(false)))
            );
        }
        assert!(matches!(
            parse_field_input(FieldKind::Flag, "maybe"),
            Err(InputError::NotBoolean(_))
        ));
        assert_eq!(parse_field_input(FieldKind::Flag, "  "), Ok(None));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            parse_field_input(FieldKind::Count, "4"),
            Ok(Some(FieldValue::Count(4)))
        );
        assert!(parse_field_input(FieldKind::Count, "-1").is_err());
        assert!(parse_field_input(FieldKind::Count, "2.5").is_err());
        assert_eq!(
            parse_field_input(FieldKind::Seconds, "1.25"),
            Ok(Some(FieldValue::Seconds(1.25)))
        );
        assert!(parse_field_input(FieldKind::Seconds, "NaN").is_err());
    }

    #[test]
    fn test_tag_lists_resolve_names_to_labels() {
        let kind = FieldKind::Tags(Vocabulary::TextType);
        assert_eq!(
            parse_field_input(kind, "cta, hook, CTA"),
            Ok(Some(FieldValue::Tags(vec![
                "Call to Action".into(),
                "Hook".into()
            ])))
        );
        assert_eq!(
            parse_field_input(kind, "None"),
            Ok(Some(FieldValue::Tags(vec![])))
        );

        let err = parse_field_input(kind, "HOOK, SUBTITLES").unwrap_err();
        assert_eq!(
            err,
            InputError::UnknownNames {
                names: vec!["SUBTITLES".into()],
                choices: "CTA, TRANSCRIPT, HOOK, SPECIFICKEYWORDS".into(),
            }
        );
    }

    #[test]
    fn test_single_choice() {
        let kind = FieldKind::Choice(Vocabulary::PlaybackSpeed);
        assert_eq!(
            parse_field_input(kind, "slowed"),
            Ok(Some(FieldValue::Text("Slowed".into())))
        );
        assert!(matches!(
            parse_field_input(kind, "NORMAL, SLOWED"),
            Err(InputError::ExpectedOne(_))
        ));
        assert!(parse_field_input(kind, "fast").is_err());
    }

    #[test]
    fn test_field_prompt_mentions_current_value() {
        let field = editable_field("b_roll_visuals").unwrap();
        let prompt = field_prompt(field, &FieldValue::Tags(vec!["video".into()]));
        assert!(prompt.starts_with("b_roll_visuals [current=[video]]"));
        assert!(prompt.contains("VIDEO, IMAGE"));
    }
}
