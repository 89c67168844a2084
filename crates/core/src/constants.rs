//! Shared constants for termsift.
//!
//! Defaults for the meaningfulness gate, analytics windows and storage pools.

/// Terms shorter than this (in characters) are never recorded.
pub const DEFAULT_MIN_TERM_LEN: usize = 2;

/// A term this long is accepted even without incremental typing activity.
pub const DEFAULT_SUBSTANTIAL_TERM_LEN: usize = 3;

/// Keystroke events needed before a short term counts as deliberate.
pub const DEFAULT_MIN_KEYSTROKES: usize = 2;

/// Default number of rows in top/recent analytics lists.
pub const DEFAULT_ANALYTICS_LIMIT: usize = 10;

/// Window for the "recent activity" analytics slice.
pub const DEFAULT_ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Maximum number of rows any analytics query may return (DoS protection).
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Sessions processed in parallel during a batch replay.
pub const DEFAULT_REPLAY_CONCURRENCY: usize = 8;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// SQLite connection pool size when `TERMSIFT_DB_POOL_SIZE` is unset.
pub const DEFAULT_SQLITE_POOL_SIZE: u32 = 8;
