//! Command Parser
//!
//! One pure validation function per command. Each takes the whitespace-split
//! tokens of a line (the first token is the command name) and returns either
//! the command's parameter shape or a [`ParseError`] describing what is wrong.
//!
//! Nothing in here looks at the store: a line that parses may still fail at
//! execution time (for example with a type mismatch), but a line that does not
//! parse never reaches the store at all.
//!
//! ## Example
//!
//! ```
//! use emberkv::protocol::{parse_set, Expiry, SetCondition};
//! use std::time::Duration;
//!
//! let params = parse_set(&["SET", "session", "abc", "NX", "EX", "60"]).unwrap();
//! assert_eq!(params.condition, SetCondition::IfAbsent);
//! assert_eq!(params.expiry, Expiry::After(Duration::from_secs(60)));
//! ```

use crate::protocol::types::{
    Expiry, HGetParams, HSetParams, LPopParams, LPushParams, LRangeParams, SetCondition,
    SetParams,
};
use std::time::Duration;
use thiserror::Error;

/// Errors produced while validating a command's tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Wrong number of tokens for the command
    #[error("{command} requires {expected}")]
    Arity {
        command: &'static str,
        expected: &'static str,
    },

    /// A token that is not a recognized flag
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An invalid argument that should be an integer (a count, an index or
    /// a TTL) but is not, or is out of range. Named after the argument.
    #[error("Invalid {what}: {token}")]
    InvalidInteger { what: &'static str, token: String },

    /// A flag that takes a value came last
    #[error("Invalid {what}")]
    MissingValue { what: &'static str },

    /// Two flags that cannot appear together
    #[error("{0} and {1} cannot be used together")]
    MutuallyExclusive(&'static str, &'static str),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Splits a raw input line into tokens.
///
/// The command name is uppercased; every other token keeps its case, since
/// keys, values and fields are case-sensitive.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if let Some(name) = tokens.first_mut() {
        name.make_ascii_uppercase();
    }
    tokens
}

/// Number of tokens after the command name.
#[inline]
fn arg_count<S: AsRef<str>>(tokens: &[S]) -> usize {
    tokens.len().saturating_sub(1)
}

fn parse_integer<S: AsRef<str>>(token: &S, what: &'static str) -> ParseResult<i64> {
    let token = token.as_ref();
    token.parse().map_err(|_| ParseError::InvalidInteger {
        what,
        token: token.to_string(),
    })
}

/// Reads the integer that follows EX or PX.
///
/// Zero means no expiry. A negative amount yields a deadline that has
/// already passed, so the key is stored but never visible.
fn parse_ttl<S: AsRef<str>>(token: Option<&S>, per_unit: fn(u64) -> Duration) -> ParseResult<Expiry> {
    const WHAT: &str = "expiration time";

    let token = token.ok_or(ParseError::MissingValue { what: WHAT })?;
    let amount = parse_integer(token, WHAT)?;

    Ok(match amount {
        0 => Expiry::Clear,
        n if n < 0 => Expiry::After(Duration::ZERO),
        n => Expiry::After(per_unit(n.unsigned_abs())),
    })
}

/// `SET key value [NX|XX] [GET] [EX seconds|PX milliseconds] [KEEPTTL]`
pub fn parse_set<S: AsRef<str>>(tokens: &[S]) -> ParseResult<SetParams> {
    if arg_count(tokens) < 2 {
        return Err(ParseError::Arity {
            command: "SET",
            expected: "at least 2 arguments",
        });
    }

    let mut params = SetParams::new(tokens[1].as_ref(), tokens[2].as_ref());
    let mut nx = false;
    let mut xx = false;
    let mut keep_ttl = false;
    let mut ttl: Option<Expiry> = None;

    let mut i = 3;
    while i < tokens.len() {
        let flag = tokens[i].as_ref();
        match flag.to_ascii_uppercase().as_str() {
            "NX" => nx = true,
            "XX" => xx = true,
            "GET" => params.get = true,
            "KEEPTTL" => keep_ttl = true,
            "EX" => {
                i += 1;
                ttl = Some(parse_ttl(tokens.get(i), Duration::from_secs)?);
            }
            "PX" => {
                i += 1;
                ttl = Some(parse_ttl(tokens.get(i), Duration::from_millis)?);
            }
            _ => return Err(ParseError::InvalidArgument(flag.to_string())),
        }
        i += 1;
    }

    if nx && xx {
        return Err(ParseError::MutuallyExclusive("NX", "XX"));
    }

    params.condition = if nx {
        SetCondition::IfAbsent
    } else if xx {
        SetCondition::IfPresent
    } else {
        SetCondition::Always
    };

    params.expiry = match (ttl, keep_ttl) {
        (Some(_), true) => return Err(ParseError::MutuallyExclusive("EX/PX", "KEEPTTL")),
        (Some(expiry), false) => expiry,
        (None, true) => Expiry::Keep,
        (None, false) => Expiry::Clear,
    };

    Ok(params)
}

/// Parses a command that takes exactly one key: `GET`, `TYPE`, `TTL`, `PTTL`, `LLEN`.
pub fn parse_single_key<S: AsRef<str>>(tokens: &[S], command: &'static str) -> ParseResult<String> {
    if arg_count(tokens) != 1 {
        return Err(ParseError::Arity {
            command,
            expected: "1 argument",
        });
    }
    Ok(tokens[1].as_ref().to_string())
}

/// `GET key`
pub fn parse_get<S: AsRef<str>>(tokens: &[S]) -> ParseResult<String> {
    parse_single_key(tokens, "GET")
}

/// Parses a command that takes one or more keys: `DEL`, `EXISTS`.
pub fn parse_keys<S: AsRef<str>>(tokens: &[S], command: &'static str) -> ParseResult<Vec<String>> {
    if arg_count(tokens) < 1 {
        return Err(ParseError::Arity {
            command,
            expected: "at least 1 argument",
        });
    }
    Ok(tokens[1..].iter().map(|k| k.as_ref().to_string()).collect())
}

/// `DEL key [key ...]`
pub fn parse_del<S: AsRef<str>>(tokens: &[S]) -> ParseResult<Vec<String>> {
    parse_keys(tokens, "DEL")
}

/// `LPUSH key value [value ...]`
pub fn parse_lpush<S: AsRef<str>>(tokens: &[S]) -> ParseResult<LPushParams> {
    if arg_count(tokens) < 2 {
        return Err(ParseError::Arity {
            command: "LPUSH",
            expected: "at least 2 arguments",
        });
    }
    Ok(LPushParams {
        key: tokens[1].as_ref().to_string(),
        values: tokens[2..].iter().map(|v| v.as_ref().to_string()).collect(),
    })
}

/// `LPOP key [count]`
pub fn parse_lpop<S: AsRef<str>>(tokens: &[S]) -> ParseResult<LPopParams> {
    match arg_count(tokens) {
        0 => Err(ParseError::Arity {
            command: "LPOP",
            expected: "at least 1 argument",
        }),
        1 => Ok(LPopParams {
            key: tokens[1].as_ref().to_string(),
            count: 1,
        }),
        2 => Ok(LPopParams {
            key: tokens[1].as_ref().to_string(),
            count: parse_integer(&tokens[2], "count argument")?,
        }),
        _ => Err(ParseError::Arity {
            command: "LPOP",
            expected: "at most 2 arguments",
        }),
    }
}

/// `LRANGE key start stop`
pub fn parse_lrange<S: AsRef<str>>(tokens: &[S]) -> ParseResult<LRangeParams> {
    if arg_count(tokens) != 3 {
        return Err(ParseError::Arity {
            command: "LRANGE",
            expected: "3 arguments",
        });
    }
    Ok(LRangeParams {
        key: tokens[1].as_ref().to_string(),
        start: parse_integer(&tokens[2], "start argument")?,
        stop: parse_integer(&tokens[3], "stop argument")?,
    })
}

/// `HSET key field value [field value ...]`
pub fn parse_hset<S: AsRef<str>>(tokens: &[S]) -> ParseResult<HSetParams> {
    let count = arg_count(tokens);
    // key plus at least one pair, and pairs must be complete
    if count < 3 || count % 2 == 0 {
        return Err(ParseError::Arity {
            command: "HSET",
            expected: "field-value pairs",
        });
    }

    let fields = tokens[2..]
        .chunks_exact(2)
        .map(|pair| (pair[0].as_ref().to_string(), pair[1].as_ref().to_string()))
        .collect();

    Ok(HSetParams {
        key: tokens[1].as_ref().to_string(),
        fields,
    })
}

/// `HGET key field`
pub fn parse_hget<S: AsRef<str>>(tokens: &[S]) -> ParseResult<HGetParams> {
    if arg_count(tokens) != 2 {
        return Err(ParseError::Arity {
            command: "HGET",
            expected: "2 arguments",
        });
    }
    Ok(HGetParams {
        key: tokens[1].as_ref().to_string(),
        field: tokens[2].as_ref().to_string(),
    })
}

/// Parses a command that takes no arguments: `DBSIZE`.
pub fn parse_no_args<S: AsRef<str>>(tokens: &[S], command: &'static str) -> ParseResult<()> {
    if arg_count(tokens) != 0 {
        return Err(ParseError::Arity {
            command,
            expected: "no arguments",
        });
    }
    Ok(())
}
