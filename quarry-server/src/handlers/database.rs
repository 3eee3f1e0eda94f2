use std::collections::BTreeMap;
use std::time::Instant;

use axum::response::Response;
use quarry_catalog::DatabaseEntry;
use quarry_query::{validate_sql_select, Param};
use serde_json::json;

use crate::handlers::common::{respond_error, respond_success};
use crate::handlers::introspect::{self, table_info};
use crate::json_value::encode_rows;
use crate::resolver::Format;
use crate::state::AppState;

/// `DatabaseView`: either runs a caller-supplied `?sql=` custom query, or
/// lists every table's columns and row count plus the database's views.
pub async fn database_view(
    state: &AppState,
    entry: &DatabaseEntry,
    format: Format,
    query: &BTreeMap<String, String>,
) -> Response {
    let start = Instant::now();
    let database_hash = entry.digest.short();

    if let Some(sql) = query.get("sql") {
        return custom_sql_view(state, entry, format, sql, query, start).await;
    }

    let mut tables = Vec::new();
    for name in entry.tables.keys() {
        match table_info(&state.pool, &entry.name, name).await {
            Ok(columns) => {
                let column_names: Vec<String> = columns.into_iter().map(|c| c.name).collect();
                tables.push(json!({
                    "name": name,
                    "columns": column_names,
                    "table_rows": entry.table_rows(name),
                }));
            }
            Err(err) => return respond_error(state, format, &entry.name, &database_hash, &err, start),
        }
    }

    let views = match introspect::view_names(&state.pool, &entry.name).await {
        Ok(views) => views,
        Err(err) => return respond_error(state, format, &entry.name, &database_hash, &err, start),
    };

    let data = json!({
        "database": entry.name,
        "database_hash": database_hash,
        "tables": tables,
        "views": views,
    });

    respond_success(state, format, "database.html", data, start)
}

async fn custom_sql_view(
    state: &AppState,
    entry: &DatabaseEntry,
    format: Format,
    sql: &str,
    query: &BTreeMap<String, String>,
    start: Instant,
) -> Response {
    let database_hash = entry.digest.short();

    if let Err(err) = validate_sql_select(sql) {
        return respond_error(state, format, &entry.name, &database_hash, &err, start);
    }

    let bound_params: BTreeMap<String, String> = query
        .iter()
        .filter(|(key, _)| key.as_str() != "sql")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let params: Vec<(String, Param)> = bound_params
        .iter()
        .map(|(key, value)| (key.clone(), Param::Text(value.clone())))
        .collect();

    match state.pool.execute(&entry.name, sql, params).await {
        Ok(result) => {
            let rows = encode_rows(&result, format.as_objects());
            let data = json!({
                "database": entry.name,
                "database_hash": database_hash,
                "custom_sql": true,
                "rows": rows,
                "columns": result.columns,
                "query": { "sql": sql, "params": bound_params },
            });
            respond_success(state, format, "database.html", data, start)
        }
        Err(err) => respond_error(state, format, &entry.name, &database_hash, &err, start),
    }
}
