//! Batch stages that only load, transform and save a table.

use std::path::Path;

use clipfx_store::RecordStore;

use crate::error::WorkerResult;
use crate::logging::StageLogger;
use crate::mismatch::{find_mismatches, MismatchReport};
use crate::rules::{anomaly_table, AnomalyEngine};

/// Outcome of [`dedupe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupeReport {
    pub records_read: usize,
    pub kept: usize,
    pub duplicates: usize,
    pub blank_ids: usize,
}

/// Rewrite a table keeping the first row for each video ID.
///
/// Writes to `output`, or back over `input` when `output` is `None`.
pub async fn dedupe(
    input: &Path,
    output: Option<&Path>,
    logger: &StageLogger,
) -> WorkerResult<DedupeReport> {
    logger.log_start(&format!("removing duplicate IDs from {}", input.display()));

    let (store, load) = RecordStore::load(input).await?;
    let target = output.unwrap_or(input);
    store.save(target).await?;

    let report = DedupeReport {
        records_read: load.records_read,
        kept: store.len(),
        duplicates: load.duplicates.len(),
        blank_ids: load.blank_ids,
    };
    logger.log_completion(&format!(
        "{} rows in, {} kept, {} duplicates and {} blank IDs removed, written to {}",
        report.records_read,
        report.kept,
        report.duplicates,
        report.blank_ids,
        target.display()
    ));
    Ok(report)
}

/// Evaluate the anomaly rules over `input` and write flagged rows to
/// `output`. Returns the number of flagged rows.
pub async fn write_anomalies(
    input: &Path,
    output: &Path,
    engine: &AnomalyEngine,
    logger: &StageLogger,
) -> WorkerResult<usize> {
    logger.log_start(&format!(
        "evaluating anomaly rules (overuse threshold {})",
        engine.config().overuse_threshold
    ));

    let (store, _) = RecordStore::load(input).await?;
    let results = engine.scan(&store);
    anomaly_table(&store, &results)?.save(output).await?;

    logger.log_completion(&format!(
        "{} of {} rows flagged, written to {}",
        results.len(),
        store.len(),
        output.display()
    ));
    Ok(results.len())
}

/// Load `input` and report rows whose annotations disagree with their
/// edited script.
pub async fn mismatches(input: &Path, logger: &StageLogger) -> WorkerResult<Vec<MismatchReport>> {
    let (store, _) = RecordStore::load(input).await?;
    let reports = find_mismatches(&store);
    logger.log_completion(&format!(
        "{} of {} rows disagree with their edited script",
        reports.len(),
        store.len()
    ));
    Ok(reports)
}
