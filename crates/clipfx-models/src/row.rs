//! One video's annotation row.

use std::collections::HashMap;

use crate::normalize::{parse_list_like, to_bool, to_count, to_seconds};
use crate::schema::FieldKind;
use crate::value::FieldValue;
use crate::video::VideoId;

/// A video row: its ID plus named cells.
///
/// Cells are kept as raw text so unknown columns survive a load/save cycle
/// untouched; typed accessors normalize on read and treat a missing cell as
/// an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    video_id: VideoId,
    cells: HashMap<String, String>,
}

impl Row {
    /// Create a row with no cells.
    pub fn new(video_id: VideoId) -> Self {
        Self {
            video_id,
            cells: HashMap::new(),
        }
    }

    /// Create a row from already-parsed cells.
    pub fn from_cells(video_id: VideoId, cells: HashMap<String, String>) -> Self {
        Self { video_id, cells }
    }

    /// Builder-style cell setter.
    pub fn with_cell(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn cells(&self) -> &HashMap<String, String> {
        &self.cells
    }

    /// Raw cell, if the column exists on this row.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Raw cell, empty when missing.
    pub fn cell(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Replace a cell, returning the previous raw value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.cells.insert(column.into(), value.into())
    }

    pub fn flag(&self, column: &str) -> bool {
        to_bool(self.cell(column))
    }

    pub fn count(&self, column: &str) -> i64 {
        to_count(self.cell(column))
    }

    pub fn seconds(&self, column: &str) -> f64 {
        to_seconds(self.cell(column))
    }

    pub fn tags(&self, column: &str) -> Vec<String> {
        parse_list_like(self.cell(column))
    }

    /// Typed view of a cell.
    pub fn value(&self, kind: FieldKind, column: &str) -> FieldValue {
        FieldValue::from_cell(kind, self.cell(column))
    }
}
