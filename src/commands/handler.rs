//! Command Handler Module
//!
//! This module turns one input line into one [`Outcome`]. It tokenizes the
//! line, dispatches on the command name, runs the command's parser and then
//! the matching store operation.
//!
//! ## Error Recovery
//!
//! [`CommandHandler::execute`] is the single place where failures are
//! recovered: parse errors, type mismatches and unknown commands all become
//! [`Reply::Error`]. A failed command never changes the store and never ends
//! the session.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ tokenize()  │───>│  dispatch() │───>│ parse_*()   │     │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘     │
//! │                                               │             │
//! │                                               ▼             │
//! │                                             Store           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::commands::help::COMMAND_DESCRIPTIONS;
use crate::protocol::{
    parse_del, parse_get, parse_hget, parse_hset, parse_keys, parse_lpop, parse_lpush,
    parse_lrange, parse_no_args, parse_set, parse_single_key, tokenize, ParseError, Reply,
};
use crate::storage::{SetOutcome, Store, StoreError, Ttl};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while executing a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command's tokens did not validate
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The store rejected the operation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The command name is not recognized
    #[error("Command not found")]
    NotFound(String),
}

/// What the session should do after a line has been executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the reply and read the next line
    Reply(Reply),
    /// The operator asked to leave
    Exit,
}

/// Executes command lines against a store it owns.
#[derive(Debug, Default)]
pub struct CommandHandler {
    store: Store,
}

impl CommandHandler {
    /// Creates a new command handler that owns the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Returns the store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Executes one input line.
    ///
    /// Blank lines produce an empty array reply, which renders as nothing.
    pub fn execute(&mut self, line: &str) -> Outcome {
        let tokens = tokenize(line);

        let Some(name) = tokens.first() else {
            return Outcome::Reply(Reply::Array(Vec::new()));
        };

        if matches!(name.as_str(), "EXIT" | "QUIT") {
            return Outcome::Exit;
        }

        match self.dispatch(name, &tokens) {
            Ok(reply) => Outcome::Reply(reply),
            Err(e) => {
                debug!(command = %name, error = %e, "Command failed");
                Outcome::Reply(Reply::error(e.to_string()))
            }
        }
    }

    /// Dispatches a command to its handler.
    fn dispatch(&mut self, cmd: &str, tokens: &[String]) -> Result<Reply, CommandError> {
        debug!(command = cmd, args = tokens.len() - 1, "Dispatching command");

        match cmd {
            // String commands
            "SET" => self.cmd_set(tokens),
            "GET" => self.cmd_get(tokens),

            // List commands
            "LPUSH" => self.cmd_lpush(tokens),
            "LPOP" => self.cmd_lpop(tokens),
            "LRANGE" => self.cmd_lrange(tokens),
            "LLEN" => self.cmd_llen(tokens),

            // Hash commands
            "HSET" => self.cmd_hset(tokens),
            "HGET" => self.cmd_hget(tokens),

            // Key commands
            "DEL" => self.cmd_del(tokens),
            "EXISTS" => self.cmd_exists(tokens),
            "TYPE" => self.cmd_type(tokens),
            "TTL" => self.cmd_ttl(tokens, 1000),
            "PTTL" => self.cmd_ttl(tokens, 1),
            "DBSIZE" => self.cmd_dbsize(tokens),

            "HELP" => Ok(Reply::text(COMMAND_DESCRIPTIONS)),

            // Unknown command
            _ => Err(CommandError::NotFound(cmd.to_string())),
        }
    }

    // ========================================================================
    // String Commands
    // ========================================================================

    /// SET key value [NX|XX] [GET] [EX seconds|PX milliseconds] [KEEPTTL]
    fn cmd_set(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let params = parse_set(tokens)?;

        Ok(match self.store.set(params) {
            SetOutcome::Stored => Reply::ok(),
            SetOutcome::NotSet => Reply::Nil,
            SetOutcome::Previous(previous) => Reply::optional(previous, Reply::Text),
        })
    }

    /// GET key
    fn cmd_get(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let key = parse_get(tokens)?;
        let value = self.store.get(&key)?;
        Ok(Reply::optional(value, Reply::Text))
    }

    // ========================================================================
    // List Commands
    // ========================================================================

    /// LPUSH key value [value ...]
    fn cmd_lpush(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let params = parse_lpush(tokens)?;
        let len = self.store.lpush(&params.key, params.values)?;
        Ok(Reply::integer(len))
    }

    /// LPOP key [count]
    fn cmd_lpop(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let params = parse_lpop(tokens)?;
        let popped = self.store.lpop(&params.key, params.count)?;
        Ok(Reply::optional(popped, Reply::Array))
    }

    /// LRANGE key start stop
    fn cmd_lrange(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let params = parse_lrange(tokens)?;
        let range = self.store.lrange(&params.key, params.start, params.stop)?;
        Ok(Reply::optional(range, Reply::Array))
    }

    /// LLEN key
    fn cmd_llen(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let key = parse_single_key(tokens, "LLEN")?;
        Ok(Reply::integer(self.store.llen(&key)?))
    }

    // ========================================================================
    // Hash Commands
    // ========================================================================

    /// HSET key field value [field value ...]
    fn cmd_hset(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let params = parse_hset(tokens)?;
        let created = self.store.hset(&params.key, params.fields)?;
        Ok(Reply::integer(created))
    }

    /// HGET key field
    fn cmd_hget(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let params = parse_hget(tokens)?;
        let value = self.store.hget(&params.key, &params.field)?;
        Ok(Reply::optional(value, Reply::Text))
    }

    // ========================================================================
    // Key Commands
    // ========================================================================

    /// DEL key [key ...]
    fn cmd_del(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let keys = parse_del(tokens)?;
        Ok(Reply::integer(self.store.delete(keys.as_slice())))
    }

    /// EXISTS key [key ...]
    fn cmd_exists(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let keys = parse_keys(tokens, "EXISTS")?;
        Ok(Reply::integer(self.store.exists(keys.as_slice())))
    }

    /// TYPE key
    fn cmd_type(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        let key = parse_single_key(tokens, "TYPE")?;
        let kind = self.store.key_type(&key).map_or("none", |k| k.as_str());
        Ok(Reply::text(kind))
    }

    /// TTL key / PTTL key
    fn cmd_ttl(&mut self, tokens: &[String], millis_per_unit: u128) -> Result<Reply, CommandError> {
        let command = if millis_per_unit == 1 { "PTTL" } else { "TTL" };
        let key = parse_single_key(tokens, command)?;

        Ok(match self.store.ttl(&key) {
            Ttl::Missing => Reply::integer(-2),
            Ttl::Persistent => Reply::integer(-1),
            Ttl::Remaining(left) => Reply::integer(left.as_millis() / millis_per_unit),
        })
    }

    /// DBSIZE
    fn cmd_dbsize(&mut self, tokens: &[String]) -> Result<Reply, CommandError> {
        parse_no_args(tokens, "DBSIZE")?;
        Ok(Reply::integer(self.store.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    fn create_handler() -> CommandHandler {
        CommandHandler::new(Store::new())
    }

    /// Runs a line and returns its reply.
    fn run(handler: &mut CommandHandler, line: &str) -> Reply {
        match handler.execute(line) {
            Outcome::Reply(reply) => reply,
            Outcome::Exit => panic!("unexpected exit for {:?}", line),
        }
    }

    fn array(values: &[&str]) -> Reply {
        Reply::Array(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_set_get() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "SET name Ariz"), Reply::ok());
        assert_eq!(run(&mut handler, "GET name"), Reply::text("Ariz"));
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "set Key Value"), Reply::ok());
        assert_eq!(run(&mut handler, "get Key"), Reply::text("Value"));
        // keys keep their case
        assert_eq!(run(&mut handler, "GET key"), Reply::Nil);
    }

    #[test]
    fn test_never_written_keys() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "GET k"), Reply::Nil);
        assert_eq!(run(&mut handler, "LPOP k"), Reply::Nil);
        assert_eq!(run(&mut handler, "LRANGE k 0 -1"), Reply::Nil);
        assert_eq!(run(&mut handler, "HGET k f"), Reply::Nil);
        assert_eq!(run(&mut handler, "DEL k"), Reply::Integer(0));
    }

    #[test]
    fn test_set_with_get_option() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "SET k v1 GET"), Reply::Nil);
        assert_eq!(run(&mut handler, "SET k v2 GET"), Reply::text("v1"));
        assert_eq!(run(&mut handler, "GET k"), Reply::text("v2"));
    }

    #[test]
    fn test_set_nx_xx() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "SET k v XX"), Reply::Nil);
        assert_eq!(run(&mut handler, "DBSIZE"), Reply::Integer(0));

        run(&mut handler, "SET k v");
        assert_eq!(run(&mut handler, "SET k other NX"), Reply::Nil);
        assert_eq!(run(&mut handler, "GET k"), Reply::text("v"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_ex_expires() {
        let mut handler = create_handler();

        run(&mut handler, "SET k v EX 1");
        assert_eq!(run(&mut handler, "GET k"), Reply::text("v"));

        time::advance(Duration::from_millis(1001)).await;
        assert_eq!(run(&mut handler, "GET k"), Reply::Nil);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_keepttl() {
        let mut handler = create_handler();

        run(&mut handler, "SET k v PX 4999");
        run(&mut handler, "SET k v2 KEEPTTL");
        assert_eq!(run(&mut handler, "GET k"), Reply::text("v2"));

        time::advance(Duration::from_millis(5000)).await;
        assert_eq!(run(&mut handler, "GET k"), Reply::Nil);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_zero_and_negative_ttl() {
        let mut handler = create_handler();

        // Zero stores without expiry
        assert_eq!(run(&mut handler, "SET k v EX 0"), Reply::ok());
        assert_eq!(run(&mut handler, "TTL k"), Reply::Integer(-1));
        time::advance(Duration::from_secs(3600)).await;
        assert_eq!(run(&mut handler, "GET k"), Reply::text("v"));

        // Negative stores an entry that is already gone
        assert_eq!(run(&mut handler, "SET k v PX -5"), Reply::ok());
        assert_eq!(run(&mut handler, "GET k"), Reply::Nil);
        assert_eq!(run(&mut handler, "DBSIZE"), Reply::Integer(0));

        assert_eq!(
            run(&mut handler, "SET k v EX"),
            Reply::error("Invalid expiration time")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dbsize_skips_expired_keys() {
        let mut handler = create_handler();

        run(&mut handler, "SET k v PX 10");
        run(&mut handler, "SET other v");
        assert_eq!(run(&mut handler, "DBSIZE"), Reply::Integer(2));

        time::advance(Duration::from_millis(20)).await;
        assert_eq!(run(&mut handler, "DBSIZE"), Reply::Integer(1));
        assert_eq!(run(&mut handler, "EXISTS k"), Reply::Integer(0));
        assert_eq!(run(&mut handler, "DBSIZE"), Reply::Integer(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_and_pttl() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "TTL k"), Reply::Integer(-2));
        run(&mut handler, "SET k v");
        assert_eq!(run(&mut handler, "TTL k"), Reply::Integer(-1));

        run(&mut handler, "SET k v PX 2500");
        assert_eq!(run(&mut handler, "PTTL k"), Reply::Integer(2500));
        assert_eq!(run(&mut handler, "TTL k"), Reply::Integer(2));
    }

    #[test]
    fn test_lpush_lrange() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "LPUSH k a b"), Reply::Integer(2));
        assert_eq!(run(&mut handler, "LRANGE k 0 100"), array(&["b", "a"]));
        assert_eq!(run(&mut handler, "LLEN k"), Reply::Integer(2));
    }

    #[test]
    fn test_lpop_count() {
        let mut handler = create_handler();

        run(&mut handler, "LPUSH k a b c");
        assert_eq!(run(&mut handler, "LPOP k 2"), array(&["c", "b"]));
        assert_eq!(run(&mut handler, "LRANGE k 0 100"), array(&["a"]));
        assert_eq!(run(&mut handler, "LPOP k"), array(&["a"]));
        assert_eq!(run(&mut handler, "EXISTS k"), Reply::Integer(0));
    }

    #[test]
    fn test_lrange_edges() {
        let mut handler = create_handler();

        run(&mut handler, "LPUSH k z y x");
        assert_eq!(run(&mut handler, "LRANGE k 1 0"), array(&[]));
        assert_eq!(run(&mut handler, "LRANGE k 3 4"), array(&[]));
        assert_eq!(run(&mut handler, "LRANGE k -2 -1"), array(&["y", "z"]));
    }

    #[test]
    fn test_hset_hget() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "HSET k f1 v1 f2 v2"), Reply::Integer(2));
        assert_eq!(run(&mut handler, "HSET k f1 v3"), Reply::Integer(0));
        assert_eq!(run(&mut handler, "HGET k f1"), Reply::text("v3"));
        assert_eq!(run(&mut handler, "TYPE k"), Reply::text("hash"));
    }

    #[test]
    fn test_type_mismatch_leaves_value() {
        let mut handler = create_handler();

        run(&mut handler, "SET k v");
        assert_eq!(
            run(&mut handler, "LPUSH k x"),
            Reply::error("Value is not a list")
        );
        assert_eq!(
            run(&mut handler, "HSET k f v"),
            Reply::error("Value is not a hash")
        );
        assert_eq!(run(&mut handler, "GET k"), Reply::text("v"));
    }

    #[test]
    fn test_set_overwrites_other_kinds() {
        let mut handler = create_handler();

        run(&mut handler, "LPUSH l x");
        run(&mut handler, "HSET h f v");
        assert_eq!(run(&mut handler, "SET l v2"), Reply::ok());
        assert_eq!(run(&mut handler, "SET h v3"), Reply::ok());
        assert_eq!(run(&mut handler, "GET l"), Reply::text("v2"));
        assert_eq!(run(&mut handler, "GET h"), Reply::text("v3"));
    }

    #[test]
    fn test_failed_parse_is_repeatable() {
        let mut handler = create_handler();

        let first = run(&mut handler, "GET");
        let second = run(&mut handler, "GET");
        assert_eq!(first, Reply::error("GET requires 1 argument"));
        assert_eq!(first, second);
        assert!(handler.store().is_empty());
    }

    #[test]
    fn test_del_duplicates() {
        let mut handler = create_handler();

        run(&mut handler, "SET a 1");
        run(&mut handler, "SET b 2");
        assert_eq!(run(&mut handler, "DEL a a b c"), Reply::Integer(2));
        assert_eq!(run(&mut handler, "EXISTS a b"), Reply::Integer(0));
    }

    #[test]
    fn test_unknown_command() {
        let mut handler = create_handler();

        let reply = run(&mut handler, "FLY me to the moon");
        assert_eq!(reply, Reply::error("Command not found"));
    }

    #[test]
    fn test_help() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "help"), Reply::text(COMMAND_DESCRIPTIONS));
    }

    #[test]
    fn test_exit() {
        let mut handler = create_handler();

        assert_eq!(handler.execute("exit"), Outcome::Exit);
        assert_eq!(handler.execute("QUIT"), Outcome::Exit);
    }

    #[test]
    fn test_blank_line() {
        let mut handler = create_handler();

        assert_eq!(run(&mut handler, "   "), array(&[]));
    }
}
