use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::error::ServerError;
use crate::handlers;
use crate::resolver::{parse_path, resolve_slug, Format, Resolved, Route};
use crate::state::AppState;

/// Assembles the full route table. Beyond the literal `/` and
/// `/favicon.ico` shapes, every request is handed to [`dispatch`], which
/// owns the §4.5 path decomposition itself — path segments can carry
/// `.json`/`.jsono`/`.db` suffixes a plain axum path pattern can't
/// disambiguate from legitimate name characters.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dispatch))
        .route("/favicon.ico", get(favicon))
        .fallback(dispatch)
        .with_state(state)
}

async fn favicon() -> impl IntoResponse {
    (StatusCode::OK, ())
}

async fn dispatch(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let route = match parse_path(uri.path()) {
        Some(route) => route,
        None => return ServerError::NotFound(uri.path().to_string()).into_response(),
    };

    match &route {
        Route::Index { format } => handlers::index_view(&state, *format).await,
        Route::Database { db_slug, format } => {
            match resolve_or_redirect(&state, db_slug, &route, &uri) {
                Ok(entry) => handlers::database_view(&state, entry, *format, &query).await,
                Err(response) => response,
            }
        }
        Route::DatabaseDownload { db_slug } => {
            match resolve_or_redirect(&state, db_slug, &route, &uri) {
                Ok(entry) => handlers::database_download(entry).await,
                Err(response) => response,
            }
        }
        Route::Table { db_slug, table, format } => {
            match resolve_or_redirect(&state, db_slug, &route, &uri) {
                Ok(entry) => handlers::table_view(&state, entry, table, *format, &query).await,
                Err(response) => response,
            }
        }
        Route::Row { db_slug, table, pk_path, format } => {
            match resolve_or_redirect(&state, db_slug, &route, &uri) {
                Ok(entry) => handlers::row_view(&state, entry, table, pk_path, *format).await,
                Err(response) => response,
            }
        }
    }
}

/// Resolves `db_slug` against the catalog. A canonical match returns the
/// entry; anything else is turned directly into the final `Response` for
/// this request — a 302 to the canonical slug, or a 404.
fn resolve_or_redirect<'a>(
    state: &'a AppState,
    db_slug: &str,
    route: &Route,
    uri: &Uri,
) -> Result<&'a quarry_catalog::DatabaseEntry, Response> {
    match resolve_slug(&state.catalog, db_slug) {
        Ok(Resolved::Canonical(entry)) => Ok(entry),
        Ok(Resolved::Redirect { canonical_slug }) => {
            let target = rebuild_path(route, &canonical_slug);
            Err(redirect_response(&target, uri.query()))
        }
        Err(err) => Err(ServerError::from(err).into_response()),
    }
}

fn rebuild_path(route: &Route, canonical_slug: &str) -> String {
    match route {
        Route::Database { format, .. } => format!("/{canonical_slug}{}", suffix(*format)),
        Route::DatabaseDownload { .. } => format!("/{canonical_slug}.db"),
        Route::Table { table, format, .. } => {
            format!("/{canonical_slug}/{table}{}", suffix(*format))
        }
        Route::Row { table, pk_path, format, .. } => {
            format!("/{canonical_slug}/{table}/{pk_path}{}", suffix(*format))
        }
        Route::Index { .. } => format!("/{canonical_slug}"),
    }
}

fn suffix(format: Format) -> &'static str {
    match format {
        Format::Html => "",
        Format::Json => ".json",
        Format::Jsono => ".jsono",
    }
}

/// Builds the canonical-redirect response: a 302 whose `Location` (and
/// preload `Link`) point at the resolved slug, preserving the original
/// query string verbatim.
fn redirect_response(target_path: &str, query: Option<&str>) -> Response {
    let location = match query {
        Some(q) if !q.is_empty() => format!("{target_path}?{q}"),
        _ => target_path.to_string(),
    };
    let mut response = StatusCode::FOUND.into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value.clone());
    }
    if let Ok(value) = HeaderValue::from_str(&format!("<{location}>; rel=preload")) {
        response.headers_mut().insert(header::LINK, value);
    }
    response
}
