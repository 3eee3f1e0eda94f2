use std::time::{Duration, Instant};

use rusqlite::Connection;

/// Installs a progress-handler-backed wall-clock deadline on `conn` for the
/// lifetime of this guard, and removes it again on drop — the Rust
/// equivalent of a context manager wrapped around a single statement.
///
/// `n` (the number of SQLite virtual-machine instructions between checks) is
/// 1000 by default and drops to 1 for deadlines under 50ms, since a coarse
/// check interval would blow straight past a very tight deadline.
pub struct TimeLimit<'conn> {
    conn: &'conn Connection,
    n: i32,
}

impl<'conn> TimeLimit<'conn> {
    pub fn install(conn: &'conn Connection, limit_ms: u64) -> Self {
        let n: i32 = if limit_ms < 50 { 1 } else { 1000 };
        let deadline = Instant::now() + Duration::from_millis(limit_ms);
        conn.progress_handler(n, Some(move || Instant::now() >= deadline));
        TimeLimit { conn, n }
    }
}

impl Drop for TimeLimit<'_> {
    fn drop(&mut self) {
        self.conn.progress_handler(self.n, None::<fn() -> bool>);
    }
}
