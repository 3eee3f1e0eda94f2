use quarry_common::CoreError;
use quarry_pool::{ConnectionPool, Value};
use quarry_query::{bracket_escape_for_pragma, Param};

/// One row of `PRAGMA table_info(...)`, projected down to the two columns
/// the handlers actually need.
pub struct ColumnInfo {
    pub name: String,
    /// `0` when the column isn't part of the primary key; otherwise its
    /// 1-based position within a composite key.
    pub pk: i64,
}

/// Runs `PRAGMA table_info` against `table`. The table name is embedded
/// directly into the statement (bracket-escaped when it isn't a boring
/// identifier) because SQLite's `PRAGMA` form does not accept bound
/// parameters; safety here rests on the same immutable-mode connection
/// every other statement uses.
pub async fn table_info(
    pool: &ConnectionPool,
    db_name: &str,
    table: &str,
) -> Result<Vec<ColumnInfo>, CoreError> {
    let sql = format!("PRAGMA table_info({})", bracket_escape_for_pragma(table));
    let result = pool.execute(db_name, &sql, vec![]).await?;

    let mut columns = Vec::with_capacity(result.rows.len());
    for row in &result.rows {
        let name = match row.get(1) {
            Some(Value::Text(s)) => s.clone(),
            _ => continue,
        };
        let pk = match row.get(5) {
            Some(Value::Integer(n)) => *n,
            _ => 0,
        };
        columns.push(ColumnInfo { name, pk });
    }
    Ok(columns)
}

/// Extracts the primary-key column names from a `table_info` scan, ordered
/// by their position within a composite key (not by column order).
pub fn primary_keys(columns: &[ColumnInfo]) -> Vec<String> {
    let mut pk_columns: Vec<&ColumnInfo> = columns.iter().filter(|c| c.pk > 0).collect();
    pk_columns.sort_by_key(|c| c.pk);
    pk_columns.into_iter().map(|c| c.name.clone()).collect()
}

/// Whether `table` names a view rather than a table, plus its original DDL,
/// read from the engine's own catalog table.
pub struct CatalogMeta {
    pub is_view: bool,
    pub definition: Option<String>,
}

pub async fn catalog_meta(
    pool: &ConnectionPool,
    db_name: &str,
    table: &str,
) -> Result<Option<CatalogMeta>, CoreError> {
    let result = pool
        .execute(
            db_name,
            "select type, sql from sqlite_master where name = :p0 and type in ('table', 'view')",
            vec![("p0".to_string(), Param::Text(table.to_string()))],
        )
        .await?;

    let Some(row) = result.rows.first() else {
        return Ok(None);
    };
    let is_view = matches!(row.first(), Some(Value::Text(t)) if t == "view");
    let definition = match row.get(1) {
        Some(Value::Text(s)) => Some(s.clone()),
        _ => None,
    };
    Ok(Some(CatalogMeta { is_view, definition }))
}

/// Names of every view in the database, for the `DatabaseView` listing.
pub async fn view_names(pool: &ConnectionPool, db_name: &str) -> Result<Vec<String>, CoreError> {
    let result = pool
        .execute(
            db_name,
            "select name from sqlite_master where type = 'view' order by name",
            vec![],
        )
        .await?;
    Ok(result
        .rows
        .iter()
        .filter_map(|row| match row.first() {
            Some(Value::Text(s)) => Some(s.clone()),
            _ => None,
        })
        .collect())
}
