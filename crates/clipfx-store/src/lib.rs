//! CSV record store and edit audit log.
//!
//! This crate provides:
//! - Loading a per-genre annotation table keyed by video ID
//! - In-place cell updates with column pass-through
//! - Atomic saves (temp file + rename) and timestamped backups
//! - An append-only JSONL log of operator corrections

pub mod audit;
pub mod error;
pub mod record_store;

pub use audit::{read_entries, EditAuditLog};
pub use error::{StoreError, StoreResult};
pub use record_store::{backup, LoadReport, RecordStore};
