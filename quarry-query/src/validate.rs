use quarry_common::CoreError;

/// Validates a user-supplied custom SQL statement (the `?sql=` query
/// parameter). Safety beyond this point rests entirely on the connection
/// being opened in SQLite's immutable mode.
pub fn validate_sql_select(sql: &str) -> Result<(), CoreError> {
    let normalized = sql.trim().to_lowercase();
    if !normalized.starts_with("select ") {
        return Err(CoreError::InvalidSql(
            "Statement must begin with SELECT".to_string(),
        ));
    }
    if normalized.contains("pragma") {
        return Err(CoreError::InvalidSql(
            "Statement may not contain PRAGMA".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_select() {
        assert!(validate_sql_select("select * from widgets").is_ok());
        assert!(validate_sql_select("  SELECT 1  ").is_ok());
    }

    #[test]
    fn rejects_non_select() {
        let err = validate_sql_select("update widgets set name = 'x'").unwrap_err();
        assert!(matches!(err, CoreError::InvalidSql(_)));
    }

    #[test]
    fn rejects_pragma_anywhere_in_statement() {
        let err = validate_sql_select("select * from pragma_table_list").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("PRAGMA"));
    }
}
