use std::time::Instant;

use axum::response::{IntoResponse, Response};
use quarry_catalog::DatabaseEntry;
use quarry_query::{decode_cursor, quote_ident, unquote_plus, Param};
use serde_json::json;

use crate::error::ServerError;
use crate::handlers::common::{respond_error, respond_success};
use crate::handlers::introspect::{primary_keys, table_info};
use crate::json_value::encode_rows;
use crate::resolver::Format;
use crate::state::AppState;

/// `RowView`: looks up a single row by its primary-key tuple (or rowid,
/// when the table has none).
pub async fn row_view(
    state: &AppState,
    entry: &DatabaseEntry,
    table_raw: &str,
    pk_path: &str,
    format: Format,
) -> Response {
    let start = Instant::now();
    let database_hash = entry.digest.short();
    let table = unquote_plus(table_raw);

    let columns = match table_info(&state.pool, &entry.name, &table).await {
        Ok(c) => c,
        Err(err) => return respond_error(state, format, &entry.name, &database_hash, &err, start),
    };
    let pks = primary_keys(&columns);
    let pk_names: Vec<String> = if pks.is_empty() { vec!["rowid".to_string()] } else { pks };

    let pk_values = decode_cursor(pk_path);
    if pk_values.len() != pk_names.len() {
        return ServerError::NotFound(table).into_response();
    }

    let clauses: Vec<String> = pk_names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} = :p{i}", quote_ident(name)))
        .collect();
    let params: Vec<(String, Param)> = pk_values
        .iter()
        .enumerate()
        .map(|(i, value)| (format!("p{i}"), Param::Text(value.clone())))
        .collect();

    let sql = format!(
        "select * from {} where {}",
        quote_ident(&table),
        clauses.join(" and ")
    );

    let result = match state.pool.execute(&entry.name, &sql, params).await {
        Ok(r) => r,
        Err(err) => return respond_error(state, format, &entry.name, &database_hash, &err, start),
    };

    if result.rows.is_empty() {
        return ServerError::NotFound(table).into_response();
    }

    let rows = encode_rows(&result, format.as_objects());
    let data = json!({
        "database": entry.name,
        "database_hash": database_hash,
        "table": table,
        "rows": rows,
        "columns": result.columns,
        "primary_keys": pk_names,
        "primary_key_values": pk_values,
    });

    respond_success(state, format, "row.html", data, start)
}
