//! Append-only edit audit log (one JSON object per line).

use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use clipfx_models::EditEntry;

use crate::error::{StoreError, StoreResult};

/// Writer for the audit log.
///
/// The file is only ever opened in append mode; entries are synced to disk
/// as soon as they are written.
pub struct EditAuditLog {
    path: PathBuf,
    file: File,
    appended: usize,
}

impl EditAuditLog {
    /// Open (or create) the log for appending.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file,
            appended: 0,
        })
    }

    /// Append one entry and sync it.
    pub async fn append(&mut self, entry: &EditEntry) -> StoreResult<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        self.file.write_all(&line).await?;
        self.file.flush().await?;
        self.file.sync_data().await?;
        self.appended += 1;

        debug!(
            video_id = %entry.video_id,
            field = %entry.field,
            "Appended audit entry"
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries appended through this handle.
    pub fn appended(&self) -> usize {
        self.appended
    }
}

/// Read every entry in a log. A missing file reads as an empty log.
pub async fn read_entries(path: impl AsRef<Path>) -> StoreResult<Vec<EditEntry>> {
    let text = match fs::read_to_string(path.as_ref()).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<EditEntry>(line).map_err(StoreError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipfx_models::{FieldValue, VideoId};
    use tempfile::TempDir;

    fn entry(field: &str, old: bool, new: bool) -> EditEntry {
        EditEntry::new(
            VideoId::from("7001"),
            field,
            FieldValue::Flag(old),
            FieldValue::Flag(new),
        )
    }

    #[tokio::test]
    async fn test_append_is_cumulative_across_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("edits_log.jsonl");

        let mut log = EditAuditLog::open(&path).await.unwrap();
        log.append(&entry("transitions_present", false, true)).await.unwrap();
        assert_eq!(log.appended(), 1);
        drop(log);

        let mut log = EditAuditLog::open(&path).await.unwrap();
        log.append(&entry("sound_effects_present", true, false)).await.unwrap();

        let entries = read_entries(&path).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].field, "transitions_present");
        assert_eq!(entries[1].old_value, FieldValue::Flag(true));

        let raw = fs::read_to_string(&path).await.unwrap();
        assert_eq!(raw.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_missing_log_reads_empty() {
        let dir = TempDir::new().unwrap();
        let entries = read_entries(dir.path().join("none.jsonl")).await.unwrap();
        assert!(entries.is_empty());
    }
}
