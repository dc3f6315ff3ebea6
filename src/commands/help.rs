//! Operator-facing help text.

/// Printed once when an interactive session starts.
pub const INSTRUCTIONS: &str = "\
Commands:
SET key value [NX|XX] [GET] [EX seconds | PX milliseconds | KEEPTTL]
GET key
DEL key [key ...]
LPUSH key value [value ...]
LPOP key [count]
LRANGE key start stop
HSET key field value [field value ...]
HGET key field

Type 'HELP' to see more details about command options.";

/// Printed for the HELP command.
pub const COMMAND_DESCRIPTIONS: &str = "\
String Commands:
SET key value [NX|XX] [GET] [EX seconds | PX milliseconds | KEEPTTL]
    Set the string value of a key, replacing any value it held.
    Returns: OK, or the previous value if GET. null if NX/XX prevented the write.
    Options:
        - NX: Only set the key if it does not already exist.
        - XX: Only set the key if it already exists.
        - GET: Return the previous string value of the key.
        - EX seconds: Expire the key after this many seconds.
        - PX milliseconds: Expire the key after this many milliseconds.
        - KEEPTTL: Retain the time to live already associated with the key.
GET key
    Get the string value of a key.
    Returns: The value, or null if the key does not exist.

List Commands:
LPUSH key value [value ...]
    Insert the values at the head of the list, one after another.
    Returns: The length of the list after the push.
LPOP key [count]
    Remove and return the first count elements (default 1).
    Returns: The removed elements, or null if nothing was removed.
LRANGE key start stop
    Get the elements from start to stop, inclusive. Negative indices count from the tail.
    Returns: The elements in the range, or null if the key does not exist.
LLEN key
    Returns: The length of the list, 0 if the key does not exist.

Hash Commands:
HSET key field value [field value ...]
    Set one or more fields of a hash.
    Returns: The number of fields that were newly created.
HGET key field
    Get the value of a hash field.
    Returns: The value, or null if the key or field does not exist.

Key Commands:
DEL key [key ...]
    Returns: The number of keys removed.
EXISTS key [key ...]
    Returns: How many of the given keys exist.
TYPE key
    Returns: string, list, hash, or none.
TTL key / PTTL key
    Returns: Remaining time to live in seconds / milliseconds. -1 without TTL, -2 if missing.
DBSIZE
    Returns: The number of keys held.

Session Commands:
HELP - Show this help message.
EXIT - Exit the session. Data is not persisted.";
