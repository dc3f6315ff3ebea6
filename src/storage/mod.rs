//! Storage Engine Module
//!
//! This module provides the core storage functionality for EmberKV: a typed
//! key-value store holding strings, lists and hashes, each with an optional
//! time-to-live.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │                                                             │
//! │   HashMap<String, Entry>                                    │
//! │                                                             │
//! │   Entry { value: String | List | Hash, expires_at }         │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │ &mut self
//!              ┌─────────────┴─────────────┐
//!              │      CommandHandler       │
//!              └───────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Typed values**: operations reject keys holding the wrong kind
//! - **TTL Support**: keys set with EX/PX expire after their duration
//! - **Lazy Expiry**: expired keys are removed when next touched
//!
//! ## Example
//!
//! ```
//! use emberkv::protocol::{Expiry, SetParams};
//! use emberkv::storage::Store;
//! use std::time::Duration;
//!
//! let mut store = Store::new();
//!
//! let mut params = SetParams::new("session", "token123");
//! params.expiry = Expiry::After(Duration::from_secs(3600));
//! store.set(params);
//!
//! assert_eq!(store.hset("user:1", vec![("name".into(), "Ariz".into())]), Ok(1));
//! ```

pub mod engine;

// Re-export commonly used types
pub use engine::{
    Entry, Kind, SetOutcome, StorageStats, Store, StoreError, StoreResult, Ttl, Value,
};
