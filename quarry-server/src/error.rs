use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use quarry_common::CoreError;
use serde_json::json;

/// Errors that escape a handler before it has a chance to shape its own
/// `{ ok: false, error, ... }` payload — unresolved slugs, unknown routes,
/// and anything that isn't `InvalidSql`/`ExecutionError` (those two are
/// turned into a structured 400 body by the handler itself, per the core
/// contract, rather than bubbling here).
#[derive(Debug)]
pub enum ServerError {
    NotFound(String),
    Internal(String),
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(what) => ServerError::NotFound(what),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::NotFound(what) => {
                tracing::debug!(what, "not found");
                (StatusCode::NOT_FOUND, Json(json!({ "ok": false, "error": "Not found" })))
                    .into_response()
            }
            ServerError::Internal(message) => {
                tracing::error!(%message, "unhandled server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "ok": false, "error": "Internal error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Builds the structured error body a handler returns for `InvalidSql` or
/// `ExecutionError`: `{ ok: false, error, database, database_hash }`, always
/// on HTTP 400. The caller wraps this with the format-appropriate headers
/// (JSON directly, or as the context handed to `error.html`).
pub fn query_error_body(database: &str, database_hash: &str, err: &CoreError) -> serde_json::Value {
    tracing::warn!(database, error = %err, "query failed");
    json!({
        "ok": false,
        "error": err.to_string(),
        "database": database,
        "database_hash": database_hash,
    })
}
