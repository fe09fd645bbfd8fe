//! Typed cell values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::normalize::{join_list, parse_list_like, to_bool, to_count, to_seconds};
use crate::schema::FieldKind;

/// A cell interpreted according to its [`FieldKind`].
///
/// Serialized untagged, so audit log entries read naturally
/// (`"old_value": false`, `"new_value": ["Hook"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Count(i64),
    Seconds(f64),
    Tags(Vec<String>),
    Text(String),
}

impl FieldValue {
    /// Normalize a raw cell. Never fails; malformed cells become defaults.
    pub fn from_cell(kind: FieldKind, cell: &str) -> Self {
        match kind {
            FieldKind::Flag => FieldValue::Flag(to_bool(cell)),
            FieldKind::Count => FieldValue::Count(to_count(cell)),
            FieldKind::Seconds => FieldValue::Seconds(to_seconds(cell)),
            FieldKind::Tags(_) => FieldValue::Tags(parse_list_like(cell)),
            FieldKind::Text | FieldKind::Choice(_) => FieldValue::Text(cell.trim().to_string()),
        }
    }

    /// Value a field is reset to when its presence flag is cleared.
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Flag => FieldValue::Flag(false),
            FieldKind::Count => FieldValue::Count(0),
            FieldKind::Seconds => FieldValue::Seconds(0.0),
            FieldKind::Tags(_) => FieldValue::Tags(Vec::new()),
            FieldKind::Text | FieldKind::Choice(_) => FieldValue::Text(String::new()),
        }
    }

    /// Vocabulary values rewritten to their stored labels, so a cell
    /// holding `normal` compares equal to an answer of `NORMAL`. Values
    /// outside the vocabulary are kept as they are.
    pub fn canonical(&self, kind: FieldKind) -> Self {
        match (kind, self) {
            (FieldKind::Choice(vocabulary), FieldValue::Text(text)) => vocabulary
                .resolve(text)
                .map(|label| FieldValue::Text(label.to_string()))
                .unwrap_or_else(|| self.clone()),
            (FieldKind::Tags(vocabulary), FieldValue::Tags(items)) => FieldValue::Tags(
                items
                    .iter()
                    .map(|item| {
                        vocabulary
                            .resolve(item)
                            .map(String::from)
                            .unwrap_or_else(|| item.clone())
                    })
                    .collect(),
            ),
            _ => self.clone(),
        }
    }

    /// Encode for the CSV store.
    ///
    /// Flags use `True`/`False` to match the rest of the table.
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Flag(true) => "True".to_string(),
            FieldValue::Flag(false) => "False".to_string(),
            FieldValue::Count(n) => n.to_string(),
            FieldValue::Seconds(s) => format!("{:?}", s),
            FieldValue::Tags(items) => join_list(items),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(b) => write!(f, "{}", b),
            FieldValue::Count(n) => write!(f, "{}", n),
            FieldValue::Seconds(s) => write!(f, "{:?}", s),
            FieldValue::Tags(items) => write!(f, "[{}]", items.join(", ")),
            FieldValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;

    #[test]
    fn test_canonical_resolves_vocabulary_case() {
        let speed = FieldKind::Choice(Vocabulary::PlaybackSpeed);
        assert_eq!(
            FieldValue::Text("normal".into()).canonical(speed),
            FieldValue::Text("Normal".into())
        );
        assert_eq!(
            FieldValue::Text("warp".into()).canonical(speed),
            FieldValue::Text("warp".into())
        );
        assert_eq!(
            FieldValue::Text("normal".into()).canonical(FieldKind::Text),
            FieldValue::Text("normal".into())
        );
    }

    #[test]
    fn test_from_cell_normalizes() {
        assert_eq!(FieldValue::from_cell(FieldKind::Flag, "yes"), FieldValue::Flag(true));
        assert_eq!(FieldValue::from_cell(FieldKind::Count, "4.0"), FieldValue::Count(4));
        assert_eq!(
            FieldValue::from_cell(FieldKind::Tags(Vocabulary::TextType), "Hook, Transcript"),
            FieldValue::Tags(vec!["Hook".into(), "Transcript".into()])
        );
        assert_eq!(
            FieldValue::from_cell(FieldKind::Choice(Vocabulary::PlaybackSpeed), " Normal "),
            FieldValue::Text("Normal".into())
        );
    }

    #[test]
    fn test_to_cell() {
        assert_eq!(FieldValue::Flag(true).to_cell(), "True");
        assert_eq!(FieldValue::Flag(false).to_cell(), "False");
        assert_eq!(FieldValue::Seconds(0.0).to_cell(), "0.0");
        assert_eq!(FieldValue::Seconds(2.5).to_cell(), "2.5");
        assert_eq!(
            FieldValue::Tags(vec!["GIF".into(), "MEME".into()]).to_cell(),
            "GIF, MEME"
        );
    }

    #[test]
    fn test_serializes_untagged() {
        assert_eq!(serde_json::to_string(&FieldValue::Flag(false)).unwrap(), "false");
        assert_eq!(
            serde_json::to_string(&FieldValue::Tags(vec!["Hook".into()])).unwrap(),
            "[\"Hook\"]"
        );
    }
}
