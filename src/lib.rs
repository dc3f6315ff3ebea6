//! # EmberKV - An In-Memory Key-Value Store with a Redis-Style Shell
//!
//! EmberKV is an in-memory key-value store written in Rust, driven by an
//! interactive command line that speaks a subset of Redis' command surface.
//! It demonstrates typed storage with tagged values, lazy TTL expiry, and
//! strict command validation.
//!
//! ## Features
//!
//! - **Redis-Style Commands**: SET/GET, lists (LPUSH/LPOP/LRANGE) and hashes (HSET/HGET)
//! - **Typed Values**: each key holds a string, a list, or a hash, and commands
//!   against the wrong kind are rejected without touching the value
//! - **TTL Support**: keys set with EX/PX disappear once their time is up
//! - **Lazy Expiry**: expired keys are removed when next touched, no background task
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              EmberKV                                    │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ stdin/stdout│───>│  Session    │───>│  Command    │                  │
//! │  │             │    │             │    │  Handler    │                  │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘                  │
//! │                                               │                         │
//! │                          ┌────────────────────┴──────────┐              │
//! │                          ▼                               ▼              │
//! │                  ┌─────────────┐                 ┌─────────────┐        │
//! │                  │  Command    │  parameter      │   Store     │        │
//! │                  │  Parser     │──── shapes ────>│  (lazy TTL) │        │
//! │                  └─────────────┘                 └─────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The parser and the store never reference each other; they meet only
//! through the parameter shapes in [`protocol::types`].
//!
//! ## Quick Start
//!
//! ```
//! use emberkv::commands::{CommandHandler, Outcome};
//! use emberkv::protocol::Reply;
//! use emberkv::storage::Store;
//!
//! let mut handler = CommandHandler::new(Store::new());
//!
//! handler.execute("LPUSH queue a b c");
//! let outcome = handler.execute("LPOP queue 2");
//!
//! assert_eq!(
//!     outcome,
//!     Outcome::Reply(Reply::Array(vec!["c".into(), "b".into()]))
//! );
//! ```
//!
//! ## Supported Commands
//!
//! ### String Commands
//! - `SET key value [NX|XX] [GET] [EX seconds|PX milliseconds] [KEEPTTL]`
//! - `GET key`
//!
//! ### List Commands
//! - `LPUSH key value [value ...]`
//! - `LPOP key [count]`
//! - `LRANGE key start stop`
//! - `LLEN key`
//!
//! ### Hash Commands
//! - `HSET key field value [field value ...]`
//! - `HGET key field`
//!
//! ### Key Commands
//! - `DEL key [key ...]` / `EXISTS key [key ...]`
//! - `TYPE key`
//! - `TTL key` / `PTTL key`
//! - `DBSIZE`
//!
//! ## Module Overview
//!
//! - [`protocol`]: tokenizer, per-command parsers, parameter shapes and replies
//! - [`storage`]: the typed store with lazy expiry
//! - [`commands`]: dispatch and error recovery for one line at a time
//! - [`session`]: the async read-execute-print loop

pub mod commands;
pub mod protocol;
pub mod session;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::{CommandError, CommandHandler, Outcome};
pub use protocol::{ParseError, Reply};
pub use session::{Session, SessionError};
pub use storage::{Store, StoreError};

/// Version of EmberKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
