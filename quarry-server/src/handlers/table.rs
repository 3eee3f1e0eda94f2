use std::collections::BTreeMap;
use std::time::Instant;

use axum::response::Response;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use quarry_catalog::DatabaseEntry;
use quarry_common::PAGE_OVERFETCH;
use quarry_pool::{ExecutionResult, Value};
use quarry_query::{build_where_clauses, encode_cursor, quote_ident, unquote_plus, Param};
use serde_json::json;

use crate::handlers::common::{respond_error, respond_success};
use crate::handlers::introspect::{catalog_meta, primary_keys, table_info};
use crate::json_value::encode_rows;
use crate::resolver::Format;
use crate::state::AppState;

/// `TableView`: builds and runs the paginated, filtered `SELECT` for one
/// table or view, per §4.6 step by step.
pub async fn table_view(
    state: &AppState,
    entry: &DatabaseEntry,
    table_raw: &str,
    format: Format,
    query: &BTreeMap<String, String>,
) -> Response {
    let start = Instant::now();
    let database_hash = entry.digest.short();
    let table = unquote_plus(table_raw);

    let columns = match table_info(&state.pool, &entry.name, &table).await {
        Ok(c) => c,
        Err(err) => return respond_error(state, format, &entry.name, &database_hash, &err, start),
    };
    let pks = primary_keys(&columns);

    let meta = match catalog_meta(&state.pool, &entry.name, &table).await {
        Ok(m) => m,
        Err(err) => return respond_error(state, format, &entry.name, &database_hash, &err, start),
    };
    let is_view = meta.as_ref().map(|m| m.is_view).unwrap_or(false);
    let definition = meta.and_then(|m| m.definition);

    let use_rowid = pks.is_empty() && !is_view;

    let select_list = if use_rowid { "rowid, *" } else { "*" };
    let order_by: Option<String> = if use_rowid {
        Some("rowid".to_string())
    } else if !pks.is_empty() {
        Some(pks.iter().map(|pk| quote_ident(pk)).collect::<Vec<_>>().join(", "))
    } else {
        None
    };

    let mut filter_args = BTreeMap::new();
    let mut after_token: Option<&str> = None;
    for (key, value) in query {
        if key.starts_with('_') && !key.contains("__") {
            if key == "_after" {
                after_token = Some(value.as_str());
            }
            continue;
        }
        filter_args.insert(key.clone(), value.clone());
    }

    let (mut clauses, mut params) = match build_where_clauses(&filter_args) {
        Ok(v) => v,
        Err(err) => return respond_error(state, format, &entry.name, &database_hash, &err, start),
    };

    if let Some(token) = after_token {
        append_after_clause(token, use_rowid, &pks, &mut clauses, &mut params);
    }

    let mut sql = format!("select {select_list} from {} ", quote_ident(&table));
    if !clauses.is_empty() {
        sql.push_str("where ");
        sql.push_str(&clauses.join(" and "));
        sql.push(' ');
    }
    if let Some(order_by) = &order_by {
        sql.push_str("order by ");
        sql.push_str(order_by);
        sql.push(' ');
    }
    let limit = state.page_size + PAGE_OVERFETCH;
    sql.push_str(&format!("limit {limit}"));

    let mut result = match state.pool.execute(&entry.name, &sql, params).await {
        Ok(r) => r,
        Err(err) => return respond_error(state, format, &entry.name, &database_hash, &err, start),
    };

    let has_more = result.rows.len() > state.page_size;
    let after_link = if has_more {
        let boundary = &result.rows[state.page_size - 1];
        let token = encode_cursor(&cursor_components(&result.columns, boundary, use_rowid, &pks));
        result.rows.truncate(state.page_size);
        Some(build_after_link(entry, table_raw, &filter_args, &token))
    } else {
        None
    };

    let display_columns: Vec<String> = if use_rowid {
        result.columns.iter().skip(1).cloned().collect()
    } else {
        result.columns.clone()
    };
    let rows = if use_rowid {
        let trimmed_rows: Vec<Vec<Value>> = result.rows.iter().map(|r| r[1..].to_vec()).collect();
        let trimmed = ExecutionResult { columns: display_columns.clone(), rows: trimmed_rows };
        encode_rows(&trimmed, format.as_objects())
    } else {
        encode_rows(&result, format.as_objects())
    };

    let mut data = json!({
        "database": entry.name,
        "database_hash": database_hash,
        "table": table,
        "columns": display_columns,
        "rows": rows,
        "primary_keys": pks,
        "after_link": after_link,
    });
    if is_view {
        data["view_definition"] = json!(definition);
    } else {
        data["table_definition"] = json!(definition);
    }

    respond_success(state, format, "table.html", data, start)
}

fn append_after_clause(
    token: &str,
    use_rowid: bool,
    pks: &[String],
    clauses: &mut Vec<String>,
    params: &mut Vec<(String, Param)>,
) {
    if use_rowid {
        let param_name = format!("p{}", params.len());
        clauses.push(format!("rowid > :{param_name}"));
        params.push((param_name, parse_rowid(token)));
        return;
    }
    if pks.is_empty() {
        return;
    }
    let components = quarry_query::decode_cursor(token);
    if components.len() != pks.len() {
        return;
    }
    let base = params.len();
    for (i, (pk, value)) in pks.iter().zip(components.iter()).enumerate() {
        let param_name = format!("p{}", base + i);
        clauses.push(format!("{} > :{param_name}", quote_ident(pk)));
        params.push((param_name, Param::Text(value.clone())));
    }
}

fn parse_rowid(token: &str) -> Param {
    match token.parse::<i64>() {
        Ok(n) => Param::Integer(n),
        Err(_) => Param::Text(token.to_string()),
    }
}

/// Reads the cursor components for the page boundary row: the rowid alone,
/// or the primary-key tuple in PK order, located by column name (the
/// `select *` column order doesn't necessarily match PK order).
fn cursor_components(
    columns: &[String],
    row: &[Value],
    use_rowid: bool,
    pks: &[String],
) -> Vec<String> {
    if use_rowid {
        return vec![row[0].to_cursor_component()];
    }
    pks.iter()
        .filter_map(|pk| {
            columns
                .iter()
                .position(|c| c == pk)
                .map(|idx| row[idx].to_cursor_component())
        })
        .collect()
}

fn build_after_link(
    entry: &DatabaseEntry,
    table_raw: &str,
    filter_args: &BTreeMap<String, String>,
    token: &str,
) -> String {
    let mut pairs: Vec<String> = filter_args
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, NON_ALPHANUMERIC),
                utf8_percent_encode(v, NON_ALPHANUMERIC)
            )
        })
        .collect();
    pairs.push(format!("_after={}", utf8_percent_encode(token, NON_ALPHANUMERIC)));
    format!("/{}/{}.json?{}", entry.slug(), table_raw, pairs.join("&"))
}
