//! Interactive Session Module
//!
//! This module drives EmberKV from a line-oriented stream. The binary wires a
//! session to stdin and stdout; tests wire it to in-memory buffers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      stdin / stdout                         │
//! │                       (main.rs)                             │
//! └──────────────────────┬──────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Session                               │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ Read line   │───>│ Execute cmd │───>│ Write reply │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands run strictly one at a time: a line is fully executed and its
//! reply written before the next line is read.
//!
//! ## Example
//!
//! ```
//! use emberkv::commands::CommandHandler;
//! use emberkv::session::Session;
//! use emberkv::storage::Store;
//!
//! # tokio_test::block_on(async {
//! let mut output = Vec::new();
//! let handler = CommandHandler::new(Store::new());
//!
//! Session::new(&b"SET name Ariz\nGET name\n"[..], &mut output, handler)
//!     .with_prompt(None)
//!     .run()
//!     .await
//!     .unwrap();
//!
//! assert_eq!(output, b"OK\nAriz\n");
//! # });
//! ```

pub mod handler;

// Re-export commonly used types
pub use handler::{Session, SessionError, DEFAULT_PROMPT, MAX_LINE_LENGTH};
