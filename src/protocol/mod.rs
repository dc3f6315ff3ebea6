//! Command Protocol
//!
//! Everything between a raw input line and a storage call, and between a
//! storage result and the text shown to the operator.
//!
//! ## Modules
//!
//! - `parser`: tokenizer and one validation function per command
//! - `types`: the parameter shapes shared with the storage engine, and `Reply`
//!
//! ## Example
//!
//! ```
//! use emberkv::protocol::{parse_lrange, tokenize, Reply};
//!
//! let tokens = tokenize("lrange queue 0 -1");
//! let params = parse_lrange(&tokens).unwrap();
//! assert_eq!((params.start, params.stop), (0, -1));
//!
//! let reply = Reply::Array(vec!["b".into(), "a".into()]);
//! assert_eq!(reply.to_string(), "1) b\n2) a");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{
    parse_del, parse_get, parse_hget, parse_hset, parse_keys, parse_lpop, parse_lpush,
    parse_lrange, parse_no_args, parse_set, parse_single_key, tokenize, ParseError, ParseResult,
};
pub use types::{
    Expiry, HGetParams, HSetParams, LPopParams, LPushParams, LRangeParams, Reply, SetCondition,
    SetParams,
};
