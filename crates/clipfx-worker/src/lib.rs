//! Dataset pipeline stages for annotated short-form videos.
//!
//! This crate provides:
//! - Anomaly rules and the anomaly table
//! - The effect presence filter and view-count filter
//! - Duplicate removal and the edited-script mismatch report
//! - The interactive review session
//! - Configuration, errors and stage logging for the `clipfx` binary

pub mod config;
pub mod effects;
pub mod error;
pub mod logging;
pub mod mismatch;
pub mod pipeline;
pub mod review;
pub mod rules;
pub mod views;

pub use config::PipelineConfig;
pub use effects::{has_any_effect, prune_without_effects, EffectPruneReport};
pub use error::{WorkerError, WorkerResult};
pub use logging::StageLogger;
pub use mismatch::{check_row, find_mismatches, MismatchReport};
pub use pipeline::{dedupe, write_anomalies, DedupeReport};
pub use review::{OperatorConsole, ReviewSession, ScriptedConsole, SessionSummary, StdioConsole};
pub use rules::{anomaly_table, read_anomaly_table, AnomalyEngine, RuleConfig, Trigger};
pub use views::{prune_low_views, ViewPruneReport};
