//! Per-genre media directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::naming::extract_video_id;

/// File extensions treated as videos (compared case-insensitively).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "webm", "m4v"];

/// Result of looking up a video ID in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaMatch {
    /// Exactly one candidate file
    Unique(PathBuf),
    /// No file mentions the ID
    NotFound,
    /// Several files match equally well
    Ambiguous(Vec<PathBuf>),
}

/// One deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub path: PathBuf,
    /// `None` when the file was removed
    pub error: Option<String>,
}

impl DeletionOutcome {
    pub fn is_deleted(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Every attempted deletion, in path order
    pub outcomes: Vec<DeletionOutcome>,
    /// Video files left in place
    pub kept: usize,
    /// The directory did not exist, so nothing was scanned
    pub directory_missing: bool,
}

impl PruneReport {
    pub fn deleted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_deleted()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.deleted()
    }
}

/// A directory of downloaded videos.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    root: PathBuf,
}

impl MediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// All video files below the root, sorted by path.
    pub async fn scan(&self) -> MediaResult<Vec<PathBuf>> {
        if !self.exists() {
            return Err(MediaError::DirectoryNotFound(self.root.clone()));
        }

        let mut found = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() && is_video(&path) {
                    found.push(path);
                }
            }
        }

        found.sort();
        debug!(root = %self.root.display(), files = found.len(), "Scanned media directory");
        Ok(found)
    }

    /// Find the file for a video ID.
    ///
    /// A file whose stem equals the ID wins; otherwise any file whose stem
    /// contains the ID is a candidate.
    pub async fn match_video(&self, video_id: &str) -> MediaResult<MediaMatch> {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return Ok(MediaMatch::NotFound);
        }

        let files = self.scan().await?;
        let exact: Vec<PathBuf> = files
            .iter()
            .filter(|p| stem(p) == video_id)
            .cloned()
            .collect();

        let candidates = if exact.is_empty() {
            files
                .into_iter()
                .filter(|p| stem(p).contains(video_id))
                .collect()
        } else {
            exact
        };

        Ok(match candidates.len() {
            0 => MediaMatch::NotFound,
            1 => MediaMatch::Unique(candidates.into_iter().next().unwrap_or_default()),
            _ => MediaMatch::Ambiguous(candidates),
        })
    }

    /// Delete every video whose stem satisfies `should_delete`.
    ///
    /// Best effort: a failed deletion is recorded and the pass continues.
    /// A missing directory yields an empty report flagged
    /// `directory_missing` rather than an error.
    pub async fn prune<F>(&self, mut should_delete: F) -> MediaResult<PruneReport>
    where
        F: FnMut(&str) -> bool,
    {
        self.prune_paths(|path| should_delete(stem(path))).await
    }

    async fn prune_paths<F>(&self, mut should_delete: F) -> MediaResult<PruneReport>
    where
        F: FnMut(&Path) -> bool,
    {
        if !self.exists() {
            warn!(root = %self.root.display(), "Media directory not found, skipping file deletions");
            return Ok(PruneReport {
                directory_missing: true,
                ..PruneReport::default()
            });
        }

        let mut report = PruneReport::default();
        for path in self.scan().await? {
            if !should_delete(&path) {
                report.kept += 1;
                continue;
            }

            let outcome = match fs::remove_file(&path).await {
                Ok(()) => {
                    info!(path = %path.display(), "Deleted video file");
                    DeletionOutcome { path, error: None }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not delete video file");
                    DeletionOutcome {
                        path,
                        error: Some(e.to_string()),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    /// Delete every video whose stem contains one of `ids`.
    pub async fn delete_matching<S: AsRef<str>>(&self, ids: &[S]) -> MediaResult<PruneReport> {
        let ids: Vec<&str> = ids
            .iter()
            .map(|id| id.as_ref().trim())
            .filter(|id| !id.is_empty())
            .collect();
        self.prune(|stem| ids.iter().any(|id| stem.contains(*id))).await
    }

    /// Delete every video whose file name yields an ID in `ids`.
    ///
    /// Files without an extractable ID are kept.
    pub async fn delete_by_extracted_id<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> MediaResult<PruneReport> {
        let ids: HashSet<&str> = ids.iter().map(|id| id.as_ref().trim()).collect();
        self.prune_paths(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(extract_video_id)
                .map(|id| ids.contains(id.as_str()))
                .unwrap_or(false)
        })
        .await
    }
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

fn stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn library_with(files: &[&str]) -> (TempDir, MediaLibrary) {
        let dir = TempDir::new().unwrap();
        for name in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await.unwrap();
            }
            fs::write(&path, b"video").await.unwrap();
        }
        let library = MediaLibrary::new(dir.path());
        (dir, library)
    }

    #[tokio::test]
    async fn test_scan_filters_extensions_recursively() {
        let (_dir, library) =
            library_with(&["a_1.mp4", "nested/b_2.MOV", "notes.txt", "c_3.webm"]).await;
        let files = library.scan().await.unwrap();
        assert_eq!(files.len(), 3);
    }

    #[tokio::test]
    async fn test_match_prefers_exact_stem() {
        let (_dir, library) = library_with(&["123.mp4", "clip_123.mp4", "999_1234.mp4"]).await;
        assert_eq!(
            library.match_video("123").await.unwrap(),
            MediaMatch::Unique(library.root().join("123.mp4"))
        );
    }

    #[tokio::test]
    async fn test_match_by_substring_and_ambiguity() {
        let (_dir, library) = library_with(&["user_555.mp4", "a_777.mp4", "b_777.mov"]).await;

        assert_eq!(
            library.match_video("555").await.unwrap(),
            MediaMatch::Unique(library.root().join("user_555.mp4"))
        );
        assert!(matches!(
            library.match_video("777").await.unwrap(),
            MediaMatch::Ambiguous(paths) if paths.len() == 2
        ));
        assert_eq!(library.match_video("404").await.unwrap(), MediaMatch::NotFound);
    }

    #[tokio::test]
    async fn test_prune_deletes_matching_files() {
        let (_dir, library) = library_with(&["x_1.mp4", "x_2.mp4", "x_3.mp4"]).await;

        let report = library.prune(|stem| stem.ends_with("_2")).await.unwrap();

        assert_eq!(report.deleted(), 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.kept, 2);
        assert!(!library.root().join("x_2.mp4").exists());
        assert!(library.root().join("x_1.mp4").exists());
    }

    #[tokio::test]
    async fn test_delete_matching_ids() {
        let (_dir, library) =
            library_with(&["chef_100.mp4", "chef_200.mp4", "other_100_b.mov", "chef_300.mkv"]).await;

        let report = library.delete_matching(&["100", " "]).await.unwrap();

        assert_eq!(report.deleted(), 2);
        assert_eq!(report.kept, 2);
        assert!(library.root().join("chef_200.mp4").exists());
    }

    #[tokio::test]
    async fn test_delete_by_extracted_id() {
        let (_dir, library) =
            library_with(&["a_10.mp4", "b_100.mp4", "clip20.mp4", "holiday.mp4", "a_10.mov"]).await;

        let report = library
            .delete_by_extracted_id(&["10".to_string(), "20".to_string()])
            .await
            .unwrap();

        assert_eq!(report.deleted(), 2);
        assert!(library.root().join("b_100.mp4").exists());
        assert!(library.root().join("holiday.mp4").exists());
        assert!(!library.root().join("clip20.mp4").exists());
        assert!(library.root().join("a_10.mov").exists());
    }

    #[tokio::test]
    async fn test_failed_deletion_is_reported_and_pass_continues() {
        let (_dir, library) = library_with(&["a_1.mp4", "b_2.mp4", "c_3.mp4"]).await;
        let vanishing = library.root().join("a_1.mp4");

        // The file disappears between the scan and its deletion.
        let report = library
            .prune(|stem| {
                if stem == "a_1" {
                    std::fs::remove_file(&vanishing).unwrap();
                }
                true
            })
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.deleted(), 2);
        let failed = report.outcomes.iter().find(|o| !o.is_deleted()).unwrap();
        assert_eq!(failed.path, vanishing);
        assert!(failed.error.is_some());
        assert!(!library.root().join("c_3.mp4").exists());
    }

    #[tokio::test]
    async fn test_prune_missing_directory_is_reported() {
        let library = MediaLibrary::new("/nonexistent/clipfx/kept_videos");
        let report = library.prune(|_| true).await.unwrap();
        assert!(report.directory_missing);
        assert!(report.outcomes.is_empty());
        assert!(matches!(
            library.scan().await,
            Err(MediaError::DirectoryNotFound(_))
        ));
    }
}
