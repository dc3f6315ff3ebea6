//! Session Handler Module
//!
//! This module runs the interactive read-execute-print loop. A session reads
//! newline-terminated commands from any async reader, executes each one with
//! its [`CommandHandler`], and writes the rendered reply to any async writer.
//!
//! ## Session Lifecycle
//!
//! ```text
//! 1. Session created (owns the CommandHandler and its Store)
//!        │
//!        ▼
//! 2. ┌──────────────────────────────┐
//!    │      Main Loop               │
//!    │                              │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Write prompt            │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Read one line           │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Execute command         │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Write reply             │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │         [Loop back]          │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 3. EXIT, end of input, or I/O error
//! ```
//!
//! ## Buffer Management
//!
//! Input accumulates in a BytesMut buffer. A single read may deliver part of
//! a line or several lines at once, so lines are split off the buffer only
//! once their newline has arrived.

use crate::commands::{CommandHandler, Outcome};
use crate::protocol::Reply;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, info, trace};

/// Maximum length of a single input line (64 KB)
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// The prompt written before each line unless configured otherwise
pub const DEFAULT_PROMPT: &str = ">> ";

/// Printed when the operator exits
const GOODBYE: &str = "Exiting...";

/// Runs commands read from `R` and writes their replies to `W`.
pub struct Session<R, W> {
    reader: R,

    writer: BufWriter<W>,

    /// Buffer for incoming data
    buffer: BytesMut,

    handler: CommandHandler,

    /// Written before each line; `None` disables prompting
    prompt: Option<String>,

    /// Lines executed so far
    commands_processed: u64,

    /// Lines that produced an error reply
    errors: u64,
}

impl<R, W> Session<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new session with the default prompt.
    pub fn new(reader: R, writer: W, handler: CommandHandler) -> Self {
        Self {
            reader,
            writer: BufWriter::new(writer),
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            handler,
            prompt: Some(DEFAULT_PROMPT.to_string()),
            commands_processed: 0,
            errors: 0,
        }
    }

    /// Sets the prompt, or disables it with `None`.
    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Runs the session until EXIT or end of input.
    ///
    /// Returns the command handler so the caller can inspect the store.
    pub async fn run(mut self) -> Result<CommandHandler, SessionError> {
        info!("Session started");

        let result = self.main_loop().await;
        self.writer.flush().await?;

        let stats = self.handler.store().stats();
        info!(
            commands = self.commands_processed,
            errors = self.errors,
            keys = stats.keys,
            expired = stats.expired,
            "Session ended"
        );

        result.map(|()| self.handler)
    }

    /// The main prompt-read-execute-reply loop.
    async fn main_loop(&mut self) -> Result<(), SessionError> {
        loop {
            self.write_prompt().await?;

            let Some(line) = self.read_line().await? else {
                debug!("End of input");
                return Ok(());
            };

            if line.trim().is_empty() {
                continue;
            }

            match self.handler.execute(&line) {
                Outcome::Exit => {
                    self.write_line(GOODBYE).await?;
                    return Ok(());
                }
                Outcome::Reply(reply) => {
                    self.commands_processed += 1;
                    if reply.is_error() {
                        self.errors += 1;
                    }
                    self.write_reply(&reply).await?;
                }
            }
        }
    }

    /// Reads the next line, without its line terminator.
    ///
    /// Returns `None` once the input is exhausted. A final line without a
    /// trailing newline is still returned.
    async fn read_line(&mut self) -> Result<Option<String>, SessionError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let line = self.buffer.split_to(pos + 1);
                trace!(bytes = line.len(), remaining = self.buffer.len(), "Read line");
                return Ok(Some(decode_line(&line)));
            }

            if self.buffer.len() >= MAX_LINE_LENGTH {
                return Err(SessionError::LineTooLong {
                    max: MAX_LINE_LENGTH,
                });
            }

            // Ensure we have some capacity
            if self.buffer.capacity() - self.buffer.len() < 1024 {
                self.buffer.reserve(INITIAL_BUFFER_SIZE);
            }

            let n = self.reader.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = self.buffer.split();
                return Ok(Some(decode_line(&line)));
            }
        }
    }

    async fn write_prompt(&mut self) -> Result<(), SessionError> {
        if let Some(prompt) = &self.prompt {
            self.writer.write_all(prompt.as_bytes()).await?;
            self.writer.flush().await?;
        }
        Ok(())
    }

    /// Writes a rendered reply. Replies that render as nothing write nothing.
    async fn write_reply(&mut self, reply: &Reply) -> Result<(), SessionError> {
        let rendered = reply.to_string();
        if rendered.is_empty() {
            return Ok(());
        }
        self.write_line(&rendered).await
    }

    async fn write_line(&mut self, text: &str) -> Result<(), SessionError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Decodes a raw line, dropping the trailing `\n` or `\r\n`.
fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// I/O error on the input or output stream
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A line grew past the buffer limit without a newline
    #[error("Input line exceeds {max} bytes")]
    LineTooLong { max: usize },
}
