mod digest;
mod error;

pub use digest::Digest;
pub use error::CoreError;

/// Number of extra rows fetched past `page_size` to detect a following page
/// without a second round trip.
pub const PAGE_OVERFETCH: usize = 1;

/// Default number of rows returned per page when the caller does not override it.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Default number of worker threads backing the connection pool.
pub const DEFAULT_NUM_THREADS: usize = 3;

/// Default wall-clock budget for a single statement.
pub const DEFAULT_SQL_TIME_LIMIT_MS: u64 = 1000;

/// Size of the blocks streamed through the digest hasher while scanning a database file.
pub const HASH_BLOCK_SIZE: usize = 1024 * 1024;
