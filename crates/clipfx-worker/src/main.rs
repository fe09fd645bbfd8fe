//! `clipfx` command-line entry point.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn, Instrument};

use clipfx_media::{ExternalPlayer, MediaLibrary, VideoPlayer};
use clipfx_models::VideoEditAnalysis;
use clipfx_store::{EditAuditLog, RecordStore};
use clipfx_worker::logging::init_tracing;
use clipfx_worker::{
    dedupe, pipeline, prune_low_views, prune_without_effects, read_anomaly_table, write_anomalies,
    AnomalyEngine, OperatorConsole, PipelineConfig, ReviewSession, ScriptedConsole, StageLogger,
    StdioConsole, WorkerError, WorkerResult,
};

#[derive(Debug, Parser)]
#[command(name = "clipfx", version, about = "Clean and review annotated video datasets")]
struct Cli {
    /// Genre / category to process (overrides VIDEO_CATEGORY)
    #[arg(long, global = true)]
    genre: Option<String>,

    /// Root directory for per-genre files (overrides CLIPFX_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drop rows below the minimum play count and delete their videos
    PruneViews {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        videos_dir: Option<PathBuf>,
        #[arg(long)]
        minimum_views: Option<u64>,
    },
    /// Keep the first row for each video ID
    Dedupe {
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write here instead of overwriting the input
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Drop rows without any editing effect and delete their videos
    PruneEffects {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        videos_dir: Option<PathBuf>,
        #[arg(long)]
        backup_dir: Option<PathBuf>,
    },
    /// Write rows that trigger an anomaly rule to the anomaly table
    Anomalies {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        threshold: Option<i64>,
    },
    /// Review flagged rows interactively
    Review {
        /// Table to correct
        #[arg(long)]
        original: Option<PathBuf>,
        #[arg(long)]
        anomalies: Option<PathBuf>,
        #[arg(long)]
        videos_dir: Option<PathBuf>,
        /// Output table (ignored with --inplace)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Audit log path
        #[arg(long)]
        log: Option<PathBuf>,
        /// Write corrections back into --original
        #[arg(long)]
        inplace: bool,
        /// Player command line (overrides PLAYER_COMMAND)
        #[arg(long)]
        player: Option<String>,
        /// Do not open videos
        #[arg(long)]
        no_player: bool,
        /// Read answers from a file, one per line, instead of the terminal
        #[arg(long)]
        replay: Option<PathBuf>,
    },
    /// Report rows whose annotations disagree with their edited script
    Mismatches {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print the JSON schema of the annotation record
    Schema {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        genre,
        data_dir,
        command,
    } = cli;
    let load = || load_config(genre.as_deref(), data_dir.as_deref());

    match command {
        Command::PruneViews {
            csv,
            videos_dir,
            minimum_views,
        } => {
            let config = load()?;
            let csv = csv.unwrap_or_else(|| config.filtered_csv());
            ensure_exists(&csv)?;
            let media = MediaLibrary::new(videos_dir.unwrap_or_else(|| config.media_dir()));
            let logger = StageLogger::new("prune_views", &config.genre);
            let minimum_views = minimum_views.unwrap_or(config.minimum_views);
            run_stage(&logger, prune_low_views(&csv, minimum_views, &media, &logger)).await?;
        }
        Command::Dedupe { csv, out } => {
            let config = load()?;
            let csv = csv.unwrap_or_else(|| config.filtered_csv());
            ensure_exists(&csv)?;
            let logger = StageLogger::new("dedupe", &config.genre);
            run_stage(&logger, dedupe(&csv, out.as_deref(), &logger)).await?;
        }
        Command::PruneEffects {
            csv,
            videos_dir,
            backup_dir,
        } => {
            let config = load()?;
            let csv = csv.unwrap_or_else(|| config.filtered_csv());
            ensure_exists(&csv)?;
            let media = MediaLibrary::new(videos_dir.unwrap_or_else(|| config.media_dir()));
            let backup_dir = backup_dir.unwrap_or_else(|| config.backup_dir());
            let logger = StageLogger::new("prune_effects", &config.genre);
            run_stage(
                &logger,
                prune_without_effects(&csv, &backup_dir, &media, &logger),
            )
            .await?;
        }
        Command::Anomalies {
            csv,
            out,
            threshold,
        } => {
            let config = load()?;
            let csv = csv.unwrap_or_else(|| config.filtered_csv());
            ensure_exists(&csv)?;
            let out = out.unwrap_or_else(|| config.anomalies_csv());
            let mut rules = config.rule_config();
            if let Some(threshold) = threshold {
                rules.overuse_threshold = threshold;
            }
            let logger = StageLogger::new("anomalies", &config.genre);
            let engine = AnomalyEngine::new(rules);
            run_stage(&logger, write_anomalies(&csv, &out, &engine, &logger)).await?;
        }
        Command::Review {
            original,
            anomalies,
            videos_dir,
            out,
            log,
            inplace,
            player,
            no_player,
            replay,
        } => {
            let config = load()?;
            let logger = StageLogger::new("review", &config.genre);
            let original = original.unwrap_or_else(|| config.filtered_csv());
            let anomalies = anomalies.unwrap_or_else(|| config.anomalies_csv());
            ensure_exists(&original)?;
            ensure_exists(&anomalies)?;
            let output = if inplace {
                original.clone()
            } else {
                out.unwrap_or_else(|| config.updated_csv())
            };

            let (mut store, _) = RecordStore::load(&original)
                .await
                .with_context(|| format!("loading {}", original.display()))?;
            let flagged = read_anomaly_table(&anomalies).await?;
            info!(flagged = flagged.len(), "Loaded anomalies");

            let mut audit = EditAuditLog::open(log.unwrap_or_else(|| config.edits_log())).await?;
            let audit_path = audit.path().to_path_buf();
            let media = MediaLibrary::new(videos_dir.unwrap_or_else(|| config.media_dir()));

            let player: Option<ExternalPlayer> = if no_player {
                None
            } else {
                let resolved = match player.or_else(|| config.player_command.clone()) {
                    Some(command) => ExternalPlayer::resolve(&command),
                    None => ExternalPlayer::system_default(),
                };
                match resolved {
                    Ok(player) => Some(player),
                    Err(e) => {
                        warn!(error = %e, "No video player available, continuing without playback");
                        None
                    }
                }
            };

            let mut console: Box<dyn OperatorConsole> = match replay {
                Some(path) => Box::new(ScriptedConsole::from_file(&path).await?),
                None => Box::new(StdioConsole::new()),
            };

            let mut session =
                ReviewSession::new(&mut store, &output, &mut audit, console.as_mut()).with_media(&media);
            if let Some(player) = player.as_ref() {
                session = session.with_player(player as &dyn VideoPlayer);
            }

            let session_id = session.session_id();
            let output = session.output().to_path_buf();
            let summary = match session.run(&flagged).instrument(logger.create_span()).await {
                Ok(summary) => summary,
                Err(e) => {
                    if e.is_fatal() {
                        logger.log_error(&format!(
                            "session {} halted, edits accepted so far are in {}",
                            session_id,
                            audit_path.display()
                        ));
                    }
                    return Err(e.into());
                }
            };
            info!(
                session_id = %session_id,
                output = %output.display(),
                reviewed = summary.reviewed,
                changed = summary.changed,
                skipped = summary.skipped,
                missing = summary.missing,
                edits = summary.edits,
                audit_log = %audit_path.display(),
                "Review complete"
            );
        }
        Command::Mismatches { csv } => {
            let config = load()?;
            let csv = csv.unwrap_or_else(|| config.filtered_csv());
            ensure_exists(&csv)?;
            let logger = StageLogger::new("mismatches", &config.genre);
            let reports = run_stage(&logger, pipeline::mismatches(&csv, &logger)).await?;
            for report in reports {
                println!("{}", serde_json::to_string(&report)?);
            }
        }
        Command::Schema { out } => {
            let schema = VideoEditAnalysis::schema_json()?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, schema)
                        .await
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "Wrote annotation schema");
                }
                None => println!("{}", schema),
            }
        }
    }

    Ok(())
}

/// Run one batch stage inside its span, logging a failure against it.
async fn run_stage<T, F>(logger: &StageLogger, stage: F) -> anyhow::Result<T>
where
    F: Future<Output = WorkerResult<T>>,
{
    match stage.instrument(logger.create_span()).await {
        Ok(value) => Ok(value),
        Err(e) => {
            logger.log_error(&e.to_string());
            Err(e.into())
        }
    }
}

/// Environment config with command-line overrides applied.
fn load_config(genre: Option<&str>, data_dir: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    let mut config = PipelineConfig::from_lookup(|key| match key {
        "VIDEO_CATEGORY" => genre
            .map(String::from)
            .or_else(|| std::env::var(key).ok()),
        _ => std::env::var(key).ok(),
    })?;
    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }
    info!("Pipeline config: {:?}", config);
    Ok(config)
}

fn ensure_exists(path: &Path) -> anyhow::Result<()> {
    if !path.is_file() {
        anyhow::bail!("CSV not found: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[tokio::test]
    async fn test_run_stage_passes_values_and_errors_through() {
        let logger = StageLogger::new("dedupe", "food");

        let value = run_stage(&logger, async { Ok::<_, WorkerError>(3) }).await.unwrap();
        assert_eq!(value, 3);

        let err = run_stage(&logger, async {
            Err::<(), _>(WorkerError::invalid_input("missing video_id column"))
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("missing video_id column"));
    }

    #[test]
    fn test_parse_review_flags() {
        let cli = Cli::try_parse_from([
            "clipfx",
            "--genre",
            "food",
            "review",
            "--inplace",
            "--no-player",
            "--replay",
            "answers.txt",
        ])
        .unwrap();
        assert_eq!(cli.genre.as_deref(), Some("food"));
        assert!(matches!(
            cli.command,
            Command::Review {
                inplace: true,
                no_player: true,
                replay: Some(_),
                ..
            }
        ));
    }
}
