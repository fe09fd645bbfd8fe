//! Operator I/O for the review session.

use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::error::WorkerResult;

/// Line-oriented operator terminal.
#[async_trait]
pub trait OperatorConsole: Send {
    /// Show `prompt` and read one line without its terminator.
    /// `None` means input is exhausted.
    async fn read_line(&mut self, prompt: &str) -> WorkerResult<Option<String>>;

    /// Show a message line.
    async fn say(&mut self, message: &str) -> WorkerResult<()>;
}

/// Console on the process's stdin/stdout.
pub struct StdioConsole {
    stdin: BufReader<Stdin>,
    stdout: Stdout,
}

impl StdioConsole {
    pub fn new() -> Self {
        Self {
            stdin: BufReader::new(io::stdin()),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdioConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperatorConsole for StdioConsole {
    async fn read_line(&mut self, prompt: &str) -> WorkerResult<Option<String>> {
        self.stdout.write_all(prompt.as_bytes()).await?;
        self.stdout.flush().await?;

        let mut line = String::new();
        if self.stdin.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn say(&mut self, message: &str) -> WorkerResult<()> {
        self.stdout.write_all(message.as_bytes()).await?;
        self.stdout.write_all(b"\n").await?;
        self.stdout.flush().await?;
        Ok(())
    }
}

/// Console fed from a fixed list of answers.
///
/// Used to replay a recorded session and in tests. Everything shown to the
/// operator is kept in [`ScriptedConsole::transcript`].
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// One answer per line of a text file.
    pub async fn from_file(path: impl AsRef<Path>) -> WorkerResult<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Ok(Self::new(text.lines()))
    }

    /// Prompts and messages, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

#[async_trait]
impl OperatorConsole for ScriptedConsole {
    async fn read_line(&mut self, prompt: &str) -> WorkerResult<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.inputs.pop_front())
    }

    async fn say(&mut self, message: &str) -> WorkerResult<()> {
        self.transcript.push(message.to_string());
        Ok(())
    }
}
