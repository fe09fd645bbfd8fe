//! Interactive review of flagged rows.
//!
//! For each flagged row the operator sees the triggers and current values,
//! the matching video is opened, and a command decides whether the row is
//! edited, skipped or the session ends. Every accepted field change is
//! written to the store and appended to the audit log right away; the store
//! file is flushed after each changed row.

use std::path::{Path, PathBuf};

use clipfx_media::{MediaLibrary, MediaMatch, VideoPlayer};
use clipfx_models::schema::dependents_of;
use clipfx_models::{
    validate_row, AnomalyResult, EditEntry, EditableField, FieldKind, FieldValue, VideoId,
    EDITABLE_FIELDS,
};
use clipfx_store::{EditAuditLog, RecordStore};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use super::console::OperatorConsole;
use super::prompt::{field_prompt, parse_command, parse_field_input};
use super::state::{ReviewEvent, ReviewState};
use crate::error::{WorkerError, WorkerResult};

const COMMAND_PROMPT: &str = "Enter/e = edit, c/s = skip, q = quit > ";

/// Counters for a finished session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Flagged rows shown to the operator
    pub presented: usize,
    /// Rows that went through the editing walk
    pub reviewed: usize,
    /// Rows with at least one accepted change
    pub changed: usize,
    pub skipped: usize,
    /// Flagged IDs not present in the store
    pub missing: usize,
    /// Audit entries written
    pub edits: usize,
    /// The operator quit (or input ran out) before the last row
    pub quit: bool,
}

/// Result of walking one row's fields.
struct EditOutcome {
    changes: usize,
    input_closed: bool,
}

/// Drives review over a set of flagged rows.
pub struct ReviewSession<'a> {
    store: &'a mut RecordStore,
    output: PathBuf,
    audit: &'a mut EditAuditLog,
    console: &'a mut dyn OperatorConsole,
    media: Option<&'a MediaLibrary>,
    player: Option<&'a dyn VideoPlayer>,
    session_id: Uuid,
}

impl<'a> ReviewSession<'a> {
    /// `output` is where the store is flushed after each changed row.
    pub fn new(
        store: &'a mut RecordStore,
        output: impl Into<PathBuf>,
        audit: &'a mut EditAuditLog,
        console: &'a mut dyn OperatorConsole,
    ) -> Self {
        Self {
            store,
            output: output.into(),
            audit,
            console,
            media: None,
            player: None,
            session_id: Uuid::new_v4(),
        }
    }

    /// Look up each row's video in `media`.
    pub fn with_media(mut self, media: &'a MediaLibrary) -> Self {
        self.media = Some(media);
        self
    }

    /// Open matched videos with `player`.
    pub fn with_player(mut self, player: &'a dyn VideoPlayer) -> Self {
        self.player = Some(player);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Review every flagged row in order.
    ///
    /// Returns early with [`WorkerError::FlushFailed`] if a changed row
    /// cannot be persisted.
    pub async fn run(&mut self, flagged: &[AnomalyResult]) -> WorkerResult<SessionSummary> {
        let span = tracing::info_span!(
            "review_session",
            session_id = %self.session_id,
            output = %self.output.display()
        );
        self.run_rows(flagged).instrument(span).await
    }

    async fn run_rows(&mut self, flagged: &[AnomalyResult]) -> WorkerResult<SessionSummary> {
        let mut summary = SessionSummary::default();
        let total = flagged.len();
        info!(rows = total, "Review session started");

        for (idx, result) in flagged.iter().enumerate() {
            let video_id = result.video_id();
            let position = format!("[{}/{}]", idx + 1, total);

            if !self.store.contains(video_id) {
                warn!(video_id = %video_id, "Flagged video not found in store");
                self.console
                    .say(&format!("\n{} Video ID not found in table: {}", position, video_id))
                    .await?;
                summary.missing += 1;
                continue;
            }

            summary.presented += 1;
            self.present(&position, result).await?;

            let event = self.read_command().await?;
            let state = ReviewState::Presented
                .transition(event)
                .map_err(|e| WorkerError::invalid_input(e.to_string()))?;

            match state {
                ReviewState::Skipped => {
                    info!(video_id = %video_id, "Row skipped");
                    summary.skipped += 1;
                    continue;
                }
                ReviewState::Aborted => {
                    info!(video_id = %video_id, "Review stopped by operator");
                    summary.quit = true;
                    break;
                }
                _ => {}
            }

            let outcome = self.edit_row(video_id, &mut summary).await?;
            let state = state
                .transition(ReviewEvent::FinishEditing)
                .map_err(|e| WorkerError::invalid_input(e.to_string()))?;
            debug_assert_eq!(state, ReviewState::Completed);
            summary.reviewed += 1;

            if outcome.changes > 0 {
                self.finish_row(video_id).await?;
                summary.changed += 1;
            } else {
                self.console.say("No changes.").await?;
            }

            if outcome.input_closed {
                summary.quit = true;
                break;
            }
        }

        info!(
            presented = summary.presented,
            changed = summary.changed,
            skipped = summary.skipped,
            missing = summary.missing,
            edits = summary.edits,
            quit = summary.quit,
            "Review session finished"
        );
        Ok(summary)
    }

    async fn present(&mut self, position: &str, result: &AnomalyResult) -> WorkerResult<()> {
        let video_id = result.video_id();
        self.console.say(&format!("\n{}", "=".repeat(80))).await?;
        self.console
            .say(&format!("{} Reviewing video ID: {}", position, video_id))
            .await?;
        self.console
            .say(&format!("[Anomaly] {}", result.joined()))
            .await?;

        if let Some(row) = self.store.get(video_id) {
            let lines: Vec<String> = EDITABLE_FIELDS
                .iter()
                .map(|field| format!("  {}: {}", field.name, row.value(field.kind, field.name)))
                .collect();
            for line in lines {
                self.console.say(&line).await?;
            }
        }

        self.open_media(video_id).await
    }

    /// Find and open the row's video. Every failure here is a warning.
    async fn open_media(&mut self, video_id: &VideoId) -> WorkerResult<()> {
        let Some(media) = self.media else {
            return Ok(());
        };

        let path = match media.match_video(video_id.as_str()).await {
            Ok(MediaMatch::Unique(path)) => path,
            Ok(MediaMatch::NotFound) => {
                warn!(video_id = %video_id, "No video file found");
                self.console
                    .say(&format!("[warn] No video file found for {}", video_id))
                    .await?;
                return Ok(());
            }
            Ok(MediaMatch::Ambiguous(paths)) => {
                warn!(video_id = %video_id, candidates = paths.len(), "Several video files match");
                self.console
                    .say(&format!(
                        "[warn] {} video files match {}, not opening any:",
                        paths.len(),
                        video_id
                    ))
                    .await?;
                for path in paths {
                    self.console.say(&format!("  {}", path.display())).await?;
                }
                return Ok(());
            }
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "Video lookup failed");
                self.console.say(&format!("[warn] {}", e)).await?;
                return Ok(());
            }
        };

        self.console
            .say(&format!("Video: {}", path.display()))
            .await?;
        if let Some(player) = self.player {
            if let Err(e) = player.open(&path).await {
                warn!(video_id = %video_id, error = %e, "Could not open video");
                self.console
                    .say(&format!("[warn] Could not open video: {}", e))
                    .await?;
            }
        }
        Ok(())
    }

    /// Read commands until one is understood. End of input quits.
    async fn read_command(&mut self) -> WorkerResult<ReviewEvent> {
        loop {
            let Some(line) = self.console.read_line(COMMAND_PROMPT).await? else {
                return Ok(ReviewEvent::Quit);
            };
            match parse_command(&line) {
                Some(command) => return Ok(command.into()),
                None => {
                    self.console
                        .say(&format!("Unknown command {:?}", line.trim()))
                        .await?
                }
            }
        }
    }

    /// Walk the editable fields of one row.
    ///
    /// A dependent field is only offered while its presence flag is true,
    /// so flags edited earlier in the walk gate what follows.
    async fn edit_row(
        &mut self,
        video_id: &VideoId,
        summary: &mut SessionSummary,
    ) -> WorkerResult<EditOutcome> {
        let mut changes = 0;

        for field in EDITABLE_FIELDS {
            let Some(row) = self.store.get(video_id) else {
                break;
            };
            if let Some(parent) = field.parent {
                if !row.flag(parent) {
                    continue;
                }
            }
            let current = row.value(field.kind, field.name);

            let Some(new_value) = self.ask(field, &current).await? else {
                return Ok(EditOutcome {
                    changes,
                    input_closed: true,
                });
            };

            let Some(new_value) = new_value else {
                continue;
            };
            if new_value == current.canonical(field.kind) {
                continue;
            }

            let cleared = new_value == FieldValue::Flag(false);
            self.apply(video_id, field, current, new_value, summary).await?;
            changes += 1;

            if field.kind == FieldKind::Flag && cleared {
                changes += self.clear_dependents(video_id, field.name, summary).await?;
            }
        }

        Ok(EditOutcome {
            changes,
            input_closed: false,
        })
    }

    /// Prompt until the answer parses. Outer `None` means input closed;
    /// inner `None` means keep the current value.
    async fn ask(
        &mut self,
        field: &EditableField,
        current: &FieldValue,
    ) -> WorkerResult<Option<Option<FieldValue>>> {
        let prompt = field_prompt(field, current);
        loop {
            let Some(line) = self.console.read_line(&prompt).await? else {
                return Ok(None);
            };
            match parse_field_input(field.kind, &line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => self.console.say(&format!("  ({})", e)).await?,
            }
        }
    }

    /// Reset the dependents of a flag that was just set to false. Blank
    /// cells are left alone; any other cell not already holding the
    /// default is rewritten and audited.
    async fn clear_dependents(
        &mut self,
        video_id: &VideoId,
        flag: &str,
        summary: &mut SessionSummary,
    ) -> WorkerResult<usize> {
        let mut cleared = 0;
        for dependent in dependents_of(flag) {
            let Some(row) = self.store.get(video_id) else {
                break;
            };
            let old_value = row.value(dependent.kind, dependent.name);
            let default = FieldValue::default_for(dependent.kind);
            // Malformed cells read as the default but still get rewritten.
            let raw = row.cell(dependent.name).trim();
            let stale = !raw.is_empty() && raw != default.to_cell();
            if old_value != default || stale {
                self.apply(video_id, dependent, old_value, default, summary)
                    .await?;
                cleared += 1;
            }
        }
        if cleared > 0 {
            self.console
                .say(&format!("  (cleared {} field(s) that depend on {})", cleared, flag))
                .await?;
        }
        Ok(cleared)
    }

    /// Write one change to the store and the audit log.
    async fn apply(
        &mut self,
        video_id: &VideoId,
        field: &EditableField,
        old_value: FieldValue,
        new_value: FieldValue,
        summary: &mut SessionSummary,
    ) -> WorkerResult<()> {
        self.store
            .update(video_id, field.name, new_value.to_cell())?;

        let entry = EditEntry::new(video_id.clone(), field.name, old_value, new_value);
        self.audit
            .append(&entry)
            .await
            .map_err(WorkerError::AuditFailed)?;
        summary.edits += 1;

        info!(
            video_id = %video_id,
            field = field.name,
            old_value = %entry.old_value,
            new_value = %entry.new_value,
            "Field updated"
        );
        Ok(())
    }

    /// Validate and persist a changed row.
    async fn finish_row(&mut self, video_id: &VideoId) -> WorkerResult<()> {
        let problems = self
            .store
            .get(video_id)
            .map(validate_row)
            .unwrap_or_default();
        for problem in &problems {
            warn!(video_id = %video_id, problem = %problem, "Row validation warning");
            self.console
                .say(&format!("[validation] {}", problem))
                .await?;
        }

        self.store
            .save(&self.output)
            .await
            .map_err(|e| WorkerError::flush_failed(video_id.as_str(), e))?;
        self.console
            .say(&format!("Saved {}", self.output.display()))
            .await?;
        Ok(())
    }
}
