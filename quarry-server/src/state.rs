use std::sync::Arc;

use quarry_catalog::Catalog;
use quarry_pool::ConnectionPool;

use crate::args::Args;

/// Shared, read-only state handed to every request handler. Cheap to clone
/// (everything inside is already behind an `Arc`), so it is cloned once per
/// request rather than threaded through as a reference.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub pool: Arc<ConnectionPool>,
    pub page_size: usize,
    pub send_cache_headers: bool,
    pub cors_everywhere: bool,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, pool: Arc<ConnectionPool>, args: &Args) -> Self {
        AppState {
            catalog,
            pool,
            page_size: args.page_size,
            send_cache_headers: !args.no_cache_headers,
            cors_everywhere: args.cors,
        }
    }
}
