//! Effect presence filter.
//!
//! Rows where none of the visible editing effects are present carry no
//! signal for the dataset; they are removed along with their videos.

use std::path::{Path, PathBuf};

use clipfx_media::{MediaLibrary, PruneReport};
use clipfx_models::schema::{columns, EFFECT_FLAGS};
use clipfx_models::{Row, VideoId};
use clipfx_store::{backup, RecordStore, StoreError};

use crate::error::WorkerResult;
use crate::logging::StageLogger;

/// Whether any visible editing effect is marked present.
pub fn has_any_effect(row: &Row) -> bool {
    EFFECT_FLAGS.iter().any(|flag| row.flag(flag))
}

/// Outcome of [`prune_without_effects`].
#[derive(Debug, Clone)]
pub struct EffectPruneReport {
    /// Copy of the table taken before any change
    pub backup: PathBuf,
    /// Rows left in the table
    pub kept: usize,
    /// IDs of removed rows, in table order
    pub dropped: Vec<VideoId>,
    /// Media deletions for the removed rows
    pub media: PruneReport,
}

/// Remove rows without any effect, then delete their videos.
///
/// The table is backed up and rewritten before any file is touched. A video
/// is deleted when its file stem contains a removed ID. Running it again on
/// its own output removes nothing.
pub async fn prune_without_effects(
    csv_path: &Path,
    backup_dir: &Path,
    media: &MediaLibrary,
    logger: &StageLogger,
) -> WorkerResult<EffectPruneReport> {
    logger.log_start(&format!("pruning effect-less rows in {}", csv_path.display()));

    let backup_path = backup(csv_path, backup_dir).await?;
    logger.log_progress(&format!("backed up table to {}", backup_path.display()));

    let (mut store, _) = RecordStore::load(csv_path).await?;
    if store.id_column() != columns::VIDEO_ID {
        return Err(StoreError::missing_column(columns::VIDEO_ID).into());
    }
    for flag in EFFECT_FLAGS {
        if store.ensure_column(flag, "False") {
            logger.log_warning(&format!("column {} missing, treated as False", flag));
        }
    }

    let dropped: Vec<VideoId> = store
        .retain(has_any_effect)
        .into_iter()
        .map(|row| row.video_id().clone())
        .collect();
    store.save(csv_path).await?;
    logger.log_progress(&format!(
        "kept {} rows, removed {} rows",
        store.len(),
        dropped.len()
    ));

    let report = if dropped.is_empty() {
        PruneReport {
            directory_missing: !media.exists(),
            ..PruneReport::default()
        }
    } else {
        media.delete_matching(&dropped).await?
    };

    if report.directory_missing {
        logger.log_warning(&format!(
            "media directory {} not found, skipped file deletions",
            media.root().display()
        ));
    } else {
        logger.log_completion(&format!(
            "deleted {} files, kept {} files, {} deletions failed",
            report.deleted(),
            report.kept,
            report.failed()
        ));
    }

    Ok(EffectPruneReport {
        backup: backup_path,
        kept: store.len(),
        dropped,
        media: report,
    })
}
