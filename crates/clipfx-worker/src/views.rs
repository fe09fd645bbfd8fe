//! View-count filter.

use std::path::Path;

use clipfx_media::{MediaLibrary, PruneReport};
use clipfx_models::schema::columns;
use clipfx_models::{Row, VideoId};
use clipfx_store::{RecordStore, StoreError};

use crate::error::WorkerResult;
use crate::logging::StageLogger;

/// Outcome of [`prune_low_views`].
#[derive(Debug, Clone)]
pub struct ViewPruneReport {
    pub kept: usize,
    pub dropped: Vec<VideoId>,
    pub media: PruneReport,
}

/// Whether a row's play count is known and below `minimum_views`.
///
/// Unparsable or empty counts are not below anything.
pub fn is_below_minimum(row: &Row, minimum_views: u64) -> bool {
    row.cell(columns::VIDEO_PLAYCOUNT)
        .trim()
        .parse::<f64>()
        .map(|views| views.is_finite() && views < minimum_views as f64)
        .unwrap_or(false)
}

/// Drop rows under the minimum play count and delete their videos.
///
/// Videos are matched by the ID extracted from their file name.
pub async fn prune_low_views(
    csv_path: &Path,
    minimum_views: u64,
    media: &MediaLibrary,
    logger: &StageLogger,
) -> WorkerResult<ViewPruneReport> {
    let (mut store, _) = RecordStore::load(csv_path).await?;
    for required in [columns::VIDEO_ID, columns::VIDEO_PLAYCOUNT] {
        if !store.has_column(required) {
            return Err(StoreError::missing_column(required).into());
        }
    }
    logger.log_start(&format!(
        "loaded {} rows, minimum views {}",
        store.len(),
        minimum_views
    ));

    let dropped: Vec<VideoId> = store
        .retain(|row| !is_below_minimum(row, minimum_views))
        .into_iter()
        .map(|row| row.video_id().clone())
        .collect();
    logger.log_progress(&format!("below-threshold rows: {}", dropped.len()));

    let media_report = media.delete_by_extracted_id(&dropped).await?;
    if media_report.directory_missing {
        logger.log_warning(&format!(
            "media directory {} not found, skipped file deletions",
            media.root().display()
        ));
    }

    store.save(csv_path).await?;
    logger.log_completion(&format!(
        "kept {} rows, deleted {} video files",
        store.len(),
        media_report.deleted()
    ));

    Ok(ViewPruneReport {
        kept: store.len(),
        dropped,
        media: media_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    fn row(views: &str) -> Row {
        Row::new(VideoId::from("1")).with_cell(columns::VIDEO_PLAYCOUNT, views)
    }

    #[test]
    fn test_is_below_minimum() {
        assert!(is_below_minimum(&row("99999"), 100_000));
        assert!(is_below_minimum(&row("5.2e4"), 100_000));
        assert!(!is_below_minimum(&row("100000"), 100_000));
        assert!(!is_below_minimum(&row(""), 100_000));
        assert!(!is_below_minimum(&row("1.2M"), 100_000));
    }

    #[tokio::test]
    async fn test_prune_low_views() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("food_filtered.csv");
        let videos = dir.path().join("kept_food_videos");
        fs::create_dir_all(&videos).await.unwrap();

        fs::write(
            &csv_path,
            "video_id,video_playcount\n\
             101,250000\n\
             102,1200\n\
             103,unknown\n",
        )
        .await
        .unwrap();
        for name in ["a_101.mp4", "b_102.mp4", "103.mp4"] {
            fs::write(videos.join(name), b"video").await.unwrap();
        }

        let report = prune_low_views(
            &csv_path,
            100_000,
            &MediaLibrary::new(&videos),
            &StageLogger::new("prune_views", "food"),
        )
        .await
        .unwrap();

        assert_eq!(report.kept, 2);
        assert_eq!(report.dropped, vec![VideoId::from("102")]);
        assert_eq!(report.media.deleted(), 1);
        assert!(!videos.join("b_102.mp4").exists());
        assert!(videos.join("a_101.mp4").exists());

        let (store, _) = RecordStore::load(&csv_path).await.unwrap();
        assert!(store.contains(&VideoId::from("103")));
    }

    #[tokio::test]
    async fn test_requires_playcount_column() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("t.csv");
        fs::write(&csv_path, "video_id,views\n1,5\n").await.unwrap();

        let result = prune_low_views(
            &csv_path,
            10,
            &MediaLibrary::new(dir.path()),
            &StageLogger::new("prune_views", "t"),
        )
        .await;
        assert!(result.is_err());
    }
}
