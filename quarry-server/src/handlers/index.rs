use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{json, Value as Json};

use crate::handlers::common::{html_response, json_response};
use crate::resolver::Format;
use crate::state::AppState;
use crate::templating::{DebugTemplater, Templater};

const TABLES_TRUNCATED_AT: usize = 5;

/// Lists every published database, sorted by name, with a truncated preview
/// of its largest tables.
pub async fn index_view(state: &AppState, format: Format) -> Response {
    let mut data = BTreeMap::new();
    for entry in state.catalog.list() {
        let mut tables: Vec<(String, i64)> =
            entry.tables.iter().map(|(name, count)| (name.clone(), *count)).collect();
        tables.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let tables_count = tables.len();
        let table_rows: i64 = tables.iter().map(|(_, count)| count).sum();
        let tables_truncated: Vec<Json> = tables
            .iter()
            .take(TABLES_TRUNCATED_AT)
            .map(|(name, count)| json!({ "name": name, "table_rows": count }))
            .collect();

        data.insert(
            entry.name.clone(),
            json!({
                "name": entry.name,
                "hash": entry.digest.hex(),
                "path": entry.slug(),
                "tables_truncated": tables_truncated,
                "tables_count": tables_count,
                "tables_more": tables_count > TABLES_TRUNCATED_AT,
                "table_rows": table_rows,
            }),
        );
    }

    if format.is_json() {
        json_response(StatusCode::OK, json!(data), state)
    } else {
        let html = DebugTemplater.render("index.html", json!({ "databases": data }));
        html_response(StatusCode::OK, html, state)
    }
}
