//! Opening videos for the operator.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Something that can show a video to the operator.
#[async_trait]
pub trait VideoPlayer: Send + Sync {
    /// Start playback. Returns once the player has been launched, not when
    /// playback ends.
    async fn open(&self, path: &Path) -> MediaResult<()>;
}

/// Player backed by an external program found in `PATH`.
#[derive(Debug, Clone)]
pub struct ExternalPlayer {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalPlayer {
    /// Resolve a player command line such as `"mpv --really-quiet"`.
    pub fn resolve(command: &str) -> MediaResult<Self> {
        let mut parts = command.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| MediaError::PlayerNotFound(command.to_string()))?;

        let program = which::which(name).map_err(|_| MediaError::PlayerNotFound(name.to_string()))?;
        debug!(program = %program.display(), "Resolved video player");

        Ok(Self {
            program,
            args: parts.map(str::to_string).collect(),
        })
    }

    /// The desktop's default opener.
    pub fn system_default() -> MediaResult<Self> {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };
        Self::resolve(opener)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl VideoPlayer for ExternalPlayer {
    async fn open(&self, path: &Path) -> MediaResult<()> {
        if !path.exists() {
            return Err(MediaError::player_failed(format!(
                "file does not exist: {}",
                path.display()
            )));
        }

        // Detached: the review session keeps prompting while the video plays.
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MediaError::player_failed(e.to_string()))?;

        info!(
            program = %self.program.display(),
            path = %path.display(),
            pid = ?child.id(),
            "Opened video"
        );
        Ok(())
    }
}
