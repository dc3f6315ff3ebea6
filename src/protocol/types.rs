//! Parameter Shapes and Replies
//!
//! The parser produces the parameter structs defined here and the storage
//! engine consumes them, so the two layers never reference each other
//! directly. [`Reply`] is what a command evaluates to before it is rendered
//! for the operator.
//!
//! ## Rendering
//!
//! ```text
//! Nil              ->  null
//! Text("OK")       ->  OK
//! Integer(2)       ->  2
//! Array([b, a])    ->  1) b
//!                      2) a
//! Error(msg)       ->  msg
//! ```

use std::fmt;
use std::time::Duration;

/// When a SET is allowed to write, based on whether the key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetCondition {
    /// Always write
    #[default]
    Always,
    /// NX: only write if the key does not exist
    IfAbsent,
    /// XX: only write if the key already exists
    IfPresent,
}

/// What a SET does with the key's time-to-live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    /// Drop any existing TTL
    #[default]
    Clear,
    /// KEEPTTL: retain the TTL already associated with the key
    Keep,
    /// EX / PX: expire after the given duration
    After(Duration),
}

/// Parameters for `SET key value [NX|XX] [GET] [EX seconds|PX milliseconds] [KEEPTTL]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetParams {
    pub key: String,
    pub value: String,
    pub condition: SetCondition,
    /// Return the previous string value instead of `OK`
    pub get: bool,
    pub expiry: Expiry,
}

impl SetParams {
    /// A plain `SET key value` with no options.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            condition: SetCondition::default(),
            get: false,
            expiry: Expiry::default(),
        }
    }
}

/// Parameters for `LPUSH key value [value ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LPushParams {
    pub key: String,
    pub values: Vec<String>,
}

/// Parameters for `LPOP key [count]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LPopParams {
    pub key: String,
    pub count: i64,
}

/// Parameters for `LRANGE key start stop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LRangeParams {
    pub key: String,
    pub start: i64,
    pub stop: i64,
}

/// Parameters for `HSET key field value [field value ...]`.
///
/// Pairs are kept in input order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HSetParams {
    pub key: String,
    pub fields: Vec<(String, String)>,
}

/// Parameters for `HGET key field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HGetParams {
    pub key: String,
    pub field: String,
}

/// The result of evaluating one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Absent value
    Nil,
    /// A scalar printed as-is
    Text(String),
    /// A count or length
    Integer(i64),
    /// A sequence, printed one numbered line per element
    Array(Vec<String>),
    /// A failed command
    Error(String),
}

impl Reply {
    /// The acknowledgment printed after a successful write.
    pub fn ok() -> Self {
        Reply::Text("OK".to_string())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }

    pub fn integer(n: impl TryInto<i64>) -> Self {
        Reply::Integer(n.try_into().unwrap_or(i64::MAX))
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Reply::Error(msg.into())
    }

    /// `Nil` for `None`, otherwise the mapped value.
    pub fn optional<T>(value: Option<T>, f: impl FnOnce(T) -> Reply) -> Self {
        value.map(f).unwrap_or(Reply::Nil)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Nil => write!(f, "null"),
            Reply::Text(s) => write!(f, "{}", s),
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Error(msg) => write!(f, "{}", msg),
            Reply::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
        }
    }
}
