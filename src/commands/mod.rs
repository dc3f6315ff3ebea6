//! Command Handler Module
//!
//! This module implements the command processing layer for EmberKV.
//! It receives raw input lines, validates them with the protocol parser,
//! executes them against the store, and returns a [`Reply`](crate::protocol::Reply).
//!
//! ## Architecture
//!
//! ```text
//! Input line
//!       │
//!       ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Tokenize     │
//! │  - Dispatch     │
//! │  - Recover      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Command parser  │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Store       │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! ### String Commands
//! - `SET`, `GET`
//!
//! ### List Commands
//! - `LPUSH`, `LPOP`, `LRANGE`, `LLEN`
//!
//! ### Hash Commands
//! - `HSET`, `HGET`
//!
//! ### Key Commands
//! - `DEL`, `EXISTS`, `TYPE`, `TTL`, `PTTL`, `DBSIZE`
//!
//! ### Session Commands
//! - `HELP`, `EXIT` / `QUIT`

pub mod handler;
pub mod help;

// Re-export the main command handler
pub use handler::{CommandError, CommandHandler, Outcome};
