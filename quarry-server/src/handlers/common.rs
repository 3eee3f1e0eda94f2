use std::time::Instant;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use quarry_common::CoreError;
use serde_json::Value as JsonValue;

use crate::error::query_error_body;
use crate::resolver::Format;
use crate::state::AppState;
use crate::templating::{DebugTemplater, Templater};

pub fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Wraps a JSON body with the headers every JSON response gets: permissive
/// CORS unconditionally, and a one-year `Cache-Control` on success when the
/// server wasn't started with `--no-cache-headers`.
pub fn json_response(status: StatusCode, body: JsonValue, state: &AppState) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    if status.is_success() && state.send_cache_headers {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("max-age=31536000"),
        );
    }
    response
}

/// Shapes and sends a successful handler result: for JSON formats, `data`
/// is augmented with `query_ms` and returned as-is; for HTML, `data` is
/// handed to the templating collaborator as its context.
pub fn respond_success(
    state: &AppState,
    format: Format,
    template: &str,
    mut data: JsonValue,
    start: Instant,
) -> Response {
    if format.is_json() {
        data["query_ms"] = JsonValue::from(elapsed_ms(start));
        json_response(StatusCode::OK, data, state)
    } else {
        let html = DebugTemplater.render(template, data);
        html_response(StatusCode::OK, html, state)
    }
}

/// Shapes and sends an `InvalidSql` / `ExecutionError` failure: HTTP 400,
/// `{ ok: false, error, database, database_hash, query_ms }`, routed to
/// either the JSON encoder or `error.html`.
pub fn respond_error(
    state: &AppState,
    format: Format,
    database: &str,
    database_hash: &str,
    err: &CoreError,
    start: Instant,
) -> Response {
    let mut body = query_error_body(database, database_hash, err);
    body["query_ms"] = JsonValue::from(elapsed_ms(start));
    if format.is_json() {
        json_response(StatusCode::BAD_REQUEST, body, state)
    } else {
        let html = DebugTemplater.render("error.html", body);
        html_response(StatusCode::BAD_REQUEST, html, state)
    }
}

/// Wraps a rendered HTML body. CORS is attached only when `--cors` asks for
/// it on every response rather than only the JSON ones.
pub fn html_response(status: StatusCode, body: String, state: &AppState) -> Response {
    let mut response = (status, Html(body)).into_response();
    if state.cors_everywhere {
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
    if status.is_success() && state.send_cache_headers {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("max-age=31536000"),
        );
    }
    response
}
