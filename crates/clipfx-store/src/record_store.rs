//! In-memory annotation table backed by a CSV file.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use clipfx_models::schema::ID_COLUMN_CANDIDATES;
use clipfx_models::{Row, VideoId};

use crate::error::{StoreError, StoreResult};

/// What a load dropped to keep video IDs unique and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data records read from the file
    pub records_read: usize,
    /// Records skipped because the ID cell was blank
    pub blank_ids: usize,
    /// IDs seen more than once (later occurrences dropped)
    pub duplicates: Vec<VideoId>,
    /// Records with more cells than the header; the extra cells are dropped
    pub overlong_records: usize,
}

impl LoadReport {
    /// Number of records not kept.
    pub fn dropped(&self) -> usize {
        self.blank_ids + self.duplicates.len()
    }
}

/// Rows keyed by video ID, with the table's column order.
///
/// Columns are addressed by name; columns this crate knows nothing about
/// are carried through unchanged.
#[derive(Debug, Clone)]
pub struct RecordStore {
    headers: Vec<String>,
    id_column: String,
    rows: Vec<Row>,
    index: HashMap<VideoId, usize>,
}

impl RecordStore {
    /// Create an empty store with the given columns.
    pub fn new(headers: Vec<String>, id_column: impl Into<String>) -> StoreResult<Self> {
        let id_column = id_column.into();
        if !headers.iter().any(|h| h == &id_column) {
            return Err(StoreError::missing_column(id_column));
        }
        if let Some(repeated) = first_repeated(&headers) {
            return Err(StoreError::DuplicateColumn(repeated));
        }
        Ok(Self {
            headers,
            id_column,
            rows: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Load a CSV file.
    ///
    /// Rows with a blank ID are skipped and duplicate IDs keep their first
    /// occurrence; both are counted in the returned [`LoadReport`].
    pub async fn load(path: impl AsRef<Path>) -> StoreResult<(Self, LoadReport)> {
        let path = path.as_ref();
        let bytes = fs::read(path).await?;
        let (store, report) = Self::from_reader(bytes.as_slice()).map_err(|e| match e {
            StoreError::MissingHeader(_) => StoreError::MissingHeader(path.to_path_buf()),
            other => other,
        })?;

        info!(
            path = %path.display(),
            rows = store.len(),
            dropped = report.dropped(),
            "Loaded record store"
        );
        Ok((store, report))
    }

    /// Parse CSV from any reader.
    pub fn from_reader<R: Read>(reader: R) -> StoreResult<(Self, LoadReport)> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(StoreError::MissingHeader(PathBuf::new()));
        }

        let id_column = ID_COLUMN_CANDIDATES
            .iter()
            .find(|candidate| headers.iter().any(|h| h == *candidate))
            .map(|c| c.to_string())
            .ok_or_else(|| StoreError::MissingIdColumn(ID_COLUMN_CANDIDATES.join(", ")))?;

        let mut store = Self::new(headers, id_column)?;
        let mut report = LoadReport::default();

        for record in csv_reader.records() {
            let record = record?;
            report.records_read += 1;
            if record.len() > store.headers.len() {
                warn!(
                    record = report.records_read,
                    cells = record.len(),
                    columns = store.headers.len(),
                    "Record longer than header, extra cells dropped"
                );
                report.overlong_records += 1;
            }

            let cells: HashMap<String, String> = store
                .headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
                .collect();

            let Some(video_id) = VideoId::parse(cells.get(&store.id_column).map_or("", String::as_str))
            else {
                report.blank_ids += 1;
                continue;
            };

            if store.index.contains_key(&video_id) {
                warn!(video_id = %video_id, "Duplicate video ID, keeping first occurrence");
                report.duplicates.push(video_id);
                continue;
            }

            store.push(Row::from_cells(video_id, cells));
        }

        Ok((store, report))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Add a column if missing, filling existing rows with `default`.
    ///
    /// Returns `true` when the column was added.
    pub fn ensure_column(&mut self, column: &str, default: &str) -> bool {
        if self.has_column(column) {
            return false;
        }
        self.headers.push(column.to_string());
        for row in &mut self.rows {
            if row.get(column).is_none() {
                row.set(column, default);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in table order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn contains(&self, video_id: &VideoId) -> bool {
        self.index.contains_key(video_id)
    }

    pub fn get(&self, video_id: &VideoId) -> Option<&Row> {
        self.index.get(video_id).map(|&i| &self.rows[i])
    }

    /// Append a row. Its cells for unknown columns add those columns.
    pub fn insert(&mut self, row: Row) -> StoreResult<()> {
        if self.contains(row.video_id()) {
            return Err(StoreError::DuplicateVideo(row.video_id().to_string()));
        }

        let mut row = row;
        if row.get(&self.id_column).is_none() {
            let id = row.video_id().to_string();
            row.set(self.id_column.clone(), id);
        }

        let mut new_columns: Vec<&String> = row
            .cells()
            .keys()
            .filter(|k| !self.headers.contains(k))
            .collect();
        new_columns.sort();
        let new_columns: Vec<String> = new_columns.into_iter().cloned().collect();
        for column in new_columns {
            self.ensure_column(&column, "");
        }

        self.push(row);
        Ok(())
    }

    /// Replace one cell in place, returning the previous raw value.
    ///
    /// The ID column cannot be changed this way.
    pub fn update(
        &mut self,
        video_id: &VideoId,
        column: &str,
        value: impl Into<String>,
    ) -> StoreResult<String> {
        if column == self.id_column {
            return Err(StoreError::ProtectedColumn(column.to_string()));
        }
        let idx = *self
            .index
            .get(video_id)
            .ok_or_else(|| StoreError::unknown_video(video_id.as_str()))?;

        self.ensure_column(column, "");
        let previous = self.rows[idx].set(column, value).unwrap_or_default();
        debug!(video_id = %video_id, column, "Updated cell");
        Ok(previous)
    }

    /// Keep rows matching `keep`; return the removed rows in table order.
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<Row>
    where
        F: FnMut(&Row) -> bool,
    {
        let (kept, dropped): (Vec<Row>, Vec<Row>) =
            std::mem::take(&mut self.rows).into_iter().partition(|row| keep(row));

        self.index.clear();
        for row in kept {
            self.push(row);
        }
        dropped
    }

    /// Serialize header and rows, in column order.
    pub fn to_csv_bytes(&self) -> StoreResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(self.headers.iter().map(|h| row.cell(h)))?;
        }
        writer.into_inner().map_err(|e| StoreError::Io(e.into_error()))
    }

    /// Write the table atomically: a hidden temp file next to `path` is
    /// synced and then renamed over it.
    pub async fn save(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let bytes = self.to_csv_bytes()?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records.csv".to_string());
        let tmp_path = dir.join(format!(".{}.tmp", file_name));

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&tmp_path, path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(path = %path.display(), rows = self.len(), "Saved record store");
        Ok(())
    }

    fn push(&mut self, row: Row) {
        self.index.insert(row.video_id().clone(), self.rows.len());
        self.rows.push(row);
    }
}

fn first_repeated(headers: &[String]) -> Option<String> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .find(|h| !seen.insert(h.as_str()))
        .cloned()
}

/// Copy `path` into `dir` as `<stem>.backup-<YYYYmmdd-HHMMSS><ext>`.
pub async fn backup(path: impl AsRef<Path>, dir: impl AsRef<Path>) -> StoreResult<PathBuf> {
    let path = path.as_ref();
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records".to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let stamp = Local::now().format("%Y%m%d-%H%M%S");

    let backup_path = dir.join(format!("{}.backup-{}{}", stem, stamp, ext));
    fs::copy(path, &backup_path).await?;

    info!(backup = %backup_path.display(), "Backed up table");
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TABLE: &str = "\
video_id,transitions_present,b_roll_count,notes
100,True,2,\"has, comma\"
200,False,7,
300,yes,,\"multi
line\"
";

    fn parse(text: &str) -> (RecordStore, LoadReport) {
        RecordStore::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_from_reader_keeps_column_order() {
        let (store, report) = parse(TABLE);
        assert_eq!(store.headers(), &["video_id", "transitions_present", "b_roll_count", "notes"]);
        assert_eq!(store.id_column(), "video_id");
        assert_eq!(store.len(), 3);
        assert_eq!(report.dropped(), 0);

        let row = store.get(&VideoId::from("100")).unwrap();
        assert_eq!(row.cell("notes"), "has, comma");
        assert!(row.flag("transitions_present"));
    }

    #[test]
    fn test_duplicates_and_blank_ids_dropped() {
        let (store, report) = parse("video_id,x\n1,a\n,b\n1,c\n2,d\n");
        assert_eq!(store.len(), 2);
        assert_eq!(report.records_read, 4);
        assert_eq!(report.blank_ids, 1);
        assert_eq!(report.duplicates, vec![VideoId::from("1")]);
        assert_eq!(store.get(&VideoId::from("1")).unwrap().cell("x"), "a");
    }

    #[test]
    fn test_alternate_id_column() {
        let (store, _) = parse("title,videoId\nfoo,55\n");
        assert_eq!(store.id_column(), "videoId");
        assert!(store.contains(&VideoId::from("55")));
    }

    #[test]
    fn test_missing_id_column() {
        let err = RecordStore::from_reader("title,views\nfoo,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::MissingIdColumn(_)));
    }

    #[test]
    fn test_repeated_header_rejected() {
        let err = RecordStore::from_reader("video_id,x,x\n1,a,b\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateColumn(ref c) if c == "x"), "{err}");
    }

    #[test]
    fn test_overlong_records_counted() {
        let (store, report) = parse("video_id,a\n1,x,extra\n2,y\n");
        assert_eq!(store.len(), 2);
        assert_eq!(report.overlong_records, 1);
        assert_eq!(store.get(&VideoId::from("1")).unwrap().cell("a"), "x");
    }

    #[test]
    fn test_short_records_padded() {
        let (store, _) = parse("video_id,a,b\n1,x\n");
        let row = store.get(&VideoId::from("1")).unwrap();
        assert_eq!(row.get("b"), Some(""));
    }

    #[test]
    fn test_update_and_protected_id() {
        let (mut store, _) = parse(TABLE);
        let id = VideoId::from("200");

        let old = store.update(&id, "transitions_present", "True").unwrap();
        assert_eq!(old, "False");
        assert!(store.get(&id).unwrap().flag("transitions_present"));

        store.update(&id, "reviewed", "yes").unwrap();
        assert!(store.has_column("reviewed"));
        assert_eq!(store.get(&VideoId::from("100")).unwrap().get("reviewed"), Some(""));

        assert!(matches!(
            store.update(&id, "video_id", "999"),
            Err(StoreError::ProtectedColumn(_))
        ));
        assert!(matches!(
            store.update(&VideoId::from("nope"), "notes", "x"),
            Err(StoreError::UnknownVideo(_))
        ));
    }

    #[test]
    fn test_retain_rebuilds_index() {
        let (mut store, _) = parse(TABLE);
        let dropped = store.retain(|row| row.count("b_roll_count") < 5);

        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].video_id().as_str(), "200");
        assert_eq!(store.len(), 2);
        assert!(store.get(&VideoId::from("300")).is_some());
        assert!(store.get(&VideoId::from("200")).is_none());
    }

    #[test]
    fn test_insert_adds_unknown_columns() {
        let mut store = RecordStore::new(vec!["video_id".into()], "video_id").unwrap();
        store
            .insert(Row::new(VideoId::from("9")).with_cell("triggered_rules", "text-conflict"))
            .unwrap();

        assert_eq!(store.headers(), &["video_id", "triggered_rules"]);
        assert_eq!(store.rows()[0].cell("video_id"), "9");
        assert!(matches!(
            store.insert(Row::new(VideoId::from("9"))),
            Err(StoreError::DuplicateVideo(_))
        ));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filtered").join("sports_filtered.csv");
        let (original, _) = parse(TABLE);

        original.save(&path).await.unwrap();
        let (reloaded, report) = RecordStore::load(&path).await.unwrap();

        assert_eq!(report.dropped(), 0);
        assert_eq!(reloaded.headers(), original.headers());
        for (before, after) in original.rows().iter().zip(reloaded.rows()) {
            assert_eq!(before.video_id(), after.video_id());
            for column in original.headers() {
                assert_eq!(before.cell(column), after.cell(column), "column {column}");
            }
        }
        assert!(!dir.path().join("filtered").join(".sports_filtered.csv.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_empty_file_is_missing_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, b"").await.unwrap();

        let err = RecordStore::load(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingHeader(p) if p == path));
    }

    #[tokio::test]
    async fn test_backup_copies_with_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("food_filtered.csv");
        fs::write(&path, TABLE).await.unwrap();

        let backup_path = backup(&path, dir.path().join("backups").join("food")).await.unwrap();
        let name = backup_path.file_name().unwrap().to_string_lossy().into_owned();

        assert!(name.starts_with("food_filtered.backup-"));
        assert!(name.ends_with(".csv"));
        assert_eq!(fs::read_to_string(&backup_path).await.unwrap(), TABLE);
    }
}
