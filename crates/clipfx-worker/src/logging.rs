//! Structured stage logging utilities.
//!
//! Provides consistent, structured logging for pipeline stages with
//! tracing spans and contextual information.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing: colored output by default, JSON when
/// `LOG_FORMAT=json`. `RUST_LOG` directives are honored.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    if let Ok(directive) = "clipfx=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
}

/// Stage logger for structured logging with consistent formatting.
///
/// Every line carries the stage name and the genre being processed.
#[derive(Debug, Clone)]
pub struct StageLogger {
    stage: String,
    genre: String,
}

impl StageLogger {
    /// Create a logger for a stage (e.g. `"prune_effects"`) over a genre.
    pub fn new(stage: &str, genre: &str) -> Self {
        Self {
            stage: stage.to_string(),
            genre: genre.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            stage = %self.stage,
            genre = %self.genre,
            "Stage started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            stage = %self.stage,
            genre = %self.genre,
            "Stage progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            stage = %self.stage,
            genre = %self.genre,
            "Stage warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            stage = %self.stage,
            genre = %self.genre,
            "Stage error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            stage = %self.stage,
            genre = %self.genre,
            "Stage completed: {}", message
        );
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Create a tracing span for this stage.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "stage",
            stage = %self.stage,
            genre = %self.genre
        )
    }
}
