use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Publishes one or more read-only database files over HTTP.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a database file to publish. Repeat to publish several.
    #[clap(long = "db", env = "QUARRY_DB", required = true)]
    pub db: Vec<PathBuf>,

    /// Address to bind the HTTP server to.
    #[clap(long = "bind", env = "QUARRY_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port to bind the HTTP server to.
    #[clap(long = "port", env = "QUARRY_PORT", default_value = "8001")]
    pub port: u16,

    /// Number of rows returned per page before pagination kicks in.
    #[clap(
        long = "page-size",
        env = "QUARRY_PAGE_SIZE",
        default_value_t = quarry_common::DEFAULT_PAGE_SIZE
    )]
    pub page_size: usize,

    /// Number of worker threads backing the connection pool.
    #[clap(
        long = "num-threads",
        env = "QUARRY_NUM_THREADS",
        default_value_t = quarry_common::DEFAULT_NUM_THREADS
    )]
    pub num_threads: usize,

    /// Wall-clock budget, in milliseconds, allowed for a single statement.
    #[clap(
        long = "sql-time-limit-ms",
        env = "QUARRY_SQL_TIME_LIMIT_MS",
        default_value_t = quarry_common::DEFAULT_SQL_TIME_LIMIT_MS
    )]
    pub sql_time_limit_ms: u64,

    /// Send `Access-Control-Allow-Origin: *` on every response, not only JSON ones.
    #[clap(long = "cors", env = "QUARRY_CORS")]
    pub cors: bool,

    /// Disable `Cache-Control` headers on successful responses.
    #[clap(long = "no-cache-headers", env = "QUARRY_NO_CACHE_HEADERS")]
    pub no_cache_headers: bool,

    /// Log output format.
    #[clap(long = "log-format", env = "QUARRY_LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}
