use thiserror::Error;

/// The error kinds shared across the catalog, query-builder, pool, and server
/// crates. Each handler maps these onto an HTTP status and response shape;
/// `StartupError` instead terminates the process before it ever serves a request.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Database not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidSql(String),

    #[error("{0}")]
    ExecutionError(String),

    #[error("{0}")]
    StartupError(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }
}
