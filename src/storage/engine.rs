//! Typed Storage Engine with Lazy Expiry
//!
//! This module implements the core store for EmberKV: a single map from key
//! to [`Entry`], where each entry holds one of three value kinds (string, list
//! or hash) and an optional expiry time.
//!
//! ## Design Decisions
//!
//! 1. **Tagged values**: `Value` is an enum, so every type check is a pattern
//!    match that hands back a typed view of the payload.
//! 2. **Lazy expiry only**: an expired entry is removed by the next operation
//!    that touches its key. There is no background sweeper.
//! 3. **Single owner**: the store is owned by one command handler and mutated
//!    through `&mut self`; there is no interior locking.
//! 4. **Drained lists are removed**: when LPOP takes the last element of a
//!    list, the key disappears.
//!
//! Time comes from `tokio::time::Instant`, so tests can pause and advance the
//! clock deterministically.

use crate::protocol::types::{Expiry, SetCondition, SetParams};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::trace;

/// The kind of value held at a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    List,
    Hash,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::List => "list",
            Kind::Hash => "hash",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The key holds a different kind of value than the operation needs.
    /// The store is left unchanged.
    #[error("Value is not a {expected}")]
    WrongType { expected: Kind },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The payload stored at a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    /// Front of the deque is the head of the list
    List(VecDeque<String>),
    Hash(HashMap<String, String>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Hash(_) => Kind::Hash,
        }
    }
}

/// A stored value with optional expiry time.
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: Value,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Creates a new entry without expiry.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Checks if this entry has expired as of `now`.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// What a SET did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// The value was written
    Stored,
    /// NX/XX prevented the write
    NotSet,
    /// The value was written and GET was requested. Holds the previous
    /// value when the key held a string.
    Previous(Option<String>),
}

/// Remaining time-to-live of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The key does not exist
    Missing,
    /// The key exists without an expiry
    Persistent,
    Remaining(Duration),
}

/// Store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of live keys
    pub keys: usize,
    /// Keys removed by lazy expiry so far
    pub expired: u64,
}

/// The key-value store.
///
/// # Example
///
/// ```
/// use emberkv::protocol::SetParams;
/// use emberkv::storage::{SetOutcome, Store};
///
/// let mut store = Store::new();
///
/// assert_eq!(store.set(SetParams::new("name", "Ariz")), SetOutcome::Stored);
/// assert_eq!(store.get("name").unwrap(), Some("Ariz".to_string()));
///
/// store.lpush("queue", vec!["a".into(), "b".into()]).unwrap();
/// assert_eq!(
///     store.lrange("queue", 0, -1).unwrap(),
///     Some(vec!["b".to_string(), "a".to_string()])
/// );
/// ```
#[derive(Debug, Default)]
pub struct Store {
    entries: HashMap<String, Entry>,
    expired_count: u64,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the entry at `key` if its expiry has passed.
    ///
    /// Returns `true` if an entry was evicted.
    fn expire_if_due(&mut self, key: &str) -> bool {
        let now = Instant::now();
        let due = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));

        if due {
            self.entries.remove(key);
            self.expired_count += 1;
            trace!(key, "Lazily expired key");
        }

        due
    }

    /// Returns the live entry at `key`, evicting it first if it has expired.
    fn live_entry(&mut self, key: &str) -> Option<&mut Entry> {
        self.expire_if_due(key);
        self.entries.get_mut(key)
    }

    fn string_value(&mut self, key: &str) -> StoreResult<Option<&mut String>> {
        match self.live_entry(key).map(|entry| &mut entry.value) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(StoreError::WrongType {
                expected: Kind::String,
            }),
        }
    }

    fn list_value(&mut self, key: &str) -> StoreResult<Option<&mut VecDeque<String>>> {
        match self.live_entry(key).map(|entry| &mut entry.value) {
            None => Ok(None),
            Some(Value::List(list)) => Ok(Some(list)),
            Some(_) => Err(StoreError::WrongType {
                expected: Kind::List,
            }),
        }
    }

    fn hash_value(&mut self, key: &str) -> StoreResult<Option<&mut HashMap<String, String>>> {
        match self.live_entry(key).map(|entry| &mut entry.value) {
            None => Ok(None),
            Some(Value::Hash(hash)) => Ok(Some(hash)),
            Some(_) => Err(StoreError::WrongType {
                expected: Kind::Hash,
            }),
        }
    }

    /// Returns the value at `key`, creating it with `init` if the key is absent.
    ///
    /// Nothing is created when the existing entry has another kind.
    fn value_or_insert(&mut self, key: &str, init: impl FnOnce() -> Value) -> &mut Value {
        self.expire_if_due(key);
        &mut self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(init()))
            .value
    }

    // ========================================================================
    // STRING OPERATIONS
    // ========================================================================

    /// Sets the string value of a key.
    ///
    /// SET replaces whatever the key held, regardless of its kind. The
    /// previous value is only reported for GET when it was a string.
    pub fn set(&mut self, params: SetParams) -> SetOutcome {
        let SetParams {
            key,
            value,
            condition,
            get,
            expiry,
        } = params;

        self.expire_if_due(&key);
        let existing = self.entries.get(&key);

        match condition {
            SetCondition::IfAbsent if existing.is_some() => return SetOutcome::NotSet,
            SetCondition::IfPresent if existing.is_none() => return SetOutcome::NotSet,
            _ => {}
        }

        let expires_at = match expiry {
            Expiry::Clear => None,
            Expiry::Keep => existing.and_then(|entry| entry.expires_at),
            // A TTL too far out to represent never expires in practice
            Expiry::After(ttl) => Instant::now().checked_add(ttl),
        };

        let previous = self.entries.insert(
            key,
            Entry {
                value: Value::String(value),
                expires_at,
            },
        );

        if !get {
            return SetOutcome::Stored;
        }

        SetOutcome::Previous(previous.and_then(|entry| match entry.value {
            Value::String(s) => Some(s),
            _ => None,
        }))
    }

    /// Gets the string value of a key.
    pub fn get(&mut self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.string_value(key)?.cloned())
    }

    /// Deletes keys, counting each occurrence that removed something.
    ///
    /// A key listed twice is only counted once, since the second removal
    /// finds nothing.
    pub fn delete<S: AsRef<str>>(&mut self, keys: &[S]) -> usize {
        keys.iter()
            .filter(|key| {
                let key: &str = key.as_ref();
                self.expire_if_due(key);
                self.entries.remove(key).is_some()
            })
            .count()
    }

    /// Counts how many of the given keys exist. Duplicates count each time.
    pub fn exists<S: AsRef<str>>(&mut self, keys: &[S]) -> usize {
        keys.iter()
            .filter(|key| self.live_entry(key.as_ref()).is_some())
            .count()
    }

    /// Returns the kind of value at `key`, or `None` if it does not exist.
    pub fn key_type(&mut self, key: &str) -> Option<Kind> {
        self.live_entry(key).map(|entry| entry.value.kind())
    }

    /// Returns the remaining time-to-live of `key`.
    pub fn ttl(&mut self, key: &str) -> Ttl {
        match self.live_entry(key) {
            None => Ttl::Missing,
            Some(Entry {
                expires_at: None, ..
            }) => Ttl::Persistent,
            Some(Entry {
                expires_at: Some(exp),
                ..
            }) => Ttl::Remaining(exp.saturating_duration_since(Instant::now())),
        }
    }

    // ========================================================================
    // LIST OPERATIONS
    // ========================================================================

    /// Pushes values to the head of a list, creating it if needed.
    ///
    /// Each value becomes the new head in turn, so `LPUSH key a b c` leaves
    /// the list as `[c, b, a, ...]`.
    ///
    /// # Returns
    /// The length of the list after the push.
    pub fn lpush(&mut self, key: &str, values: Vec<String>) -> StoreResult<usize> {
        let Value::List(list) = self.value_or_insert(key, || Value::List(VecDeque::new())) else {
            return Err(StoreError::WrongType {
                expected: Kind::List,
            });
        };

        for value in values {
            list.push_front(value);
        }

        Ok(list.len())
    }

    /// Removes up to `count` elements from the head of a list.
    ///
    /// # Returns
    /// The removed elements head-first, or `None` if the key does not exist
    /// or nothing was removed (`count <= 0`).
    pub fn lpop(&mut self, key: &str, count: i64) -> StoreResult<Option<Vec<String>>> {
        let Some(list) = self.list_value(key)? else {
            return Ok(None);
        };

        let n = usize::try_from(count).unwrap_or(0).min(list.len());
        let popped: Vec<String> = list.drain(..n).collect();
        let drained = list.is_empty();

        // Remove the key if the list is now empty
        if drained {
            self.entries.remove(key);
        }

        Ok((!popped.is_empty()).then_some(popped))
    }

    /// Returns a range of elements from a list, head-first.
    /// Both start and stop are inclusive. Negative indices count from the tail.
    ///
    /// # Returns
    /// `None` if the key does not exist; otherwise the (possibly empty) range.
    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) -> StoreResult<Option<Vec<String>>> {
        let Some(list) = self.list_value(key)? else {
            return Ok(None);
        };

        let len = list.len() as i64;

        // Convert negative indices
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop };

        if start >= len || start > stop {
            return Ok(Some(Vec::new()));
        }
        let stop = stop.min(len - 1);

        Ok(Some(
            list.range(start as usize..=stop as usize)
                .cloned()
                .collect(),
        ))
    }

    /// Returns the length of a list, or 0 if the key does not exist.
    pub fn llen(&mut self, key: &str) -> StoreResult<usize> {
        Ok(self.list_value(key)?.map_or(0, |list| list.len()))
    }

    // ========================================================================
    // HASH OPERATIONS
    // ========================================================================

    /// Sets fields in a hash, creating it if needed. Later duplicates of a
    /// field overwrite earlier ones.
    ///
    /// # Returns
    /// The number of distinct fields that did not exist before the call.
    pub fn hset(&mut self, key: &str, fields: Vec<(String, String)>) -> StoreResult<usize> {
        let Value::Hash(hash) = self.value_or_insert(key, || Value::Hash(HashMap::new())) else {
            return Err(StoreError::WrongType {
                expected: Kind::Hash,
            });
        };

        let mut created = 0;
        for (field, value) in fields {
            if hash.insert(field, value).is_none() {
                created += 1;
            }
        }

        Ok(created)
    }

    /// Gets the value of a field in a hash.
    pub fn hget(&mut self, key: &str, field: &str) -> StoreResult<Option<String>> {
        Ok(self
            .hash_value(key)?
            .and_then(|hash| hash.get(field).cloned()))
    }

    // ========================================================================
    // BOOKKEEPING
    // ========================================================================

    /// Returns the number of live keys. Expired keys are not counted even
    /// if no operation has evicted them yet.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    /// Returns true if the store holds no live keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.len(),
            expired: self.expired_count,
        }
    }
}
