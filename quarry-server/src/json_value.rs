use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use quarry_pool::{ExecutionResult, Value};
use serde_json::{json, Value as Json};

/// Encodes one column value the way the JSON encoder overrides the default
/// scheme: binary blobs that happen to be valid UTF-8 become plain strings;
/// anything else falls back to `{ "$base64": true, "encoded": <base64> }`.
pub fn encode_value(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Integer(n) => Json::from(*n),
        Value::Real(f) => Json::from(*f),
        Value::Text(s) => Json::from(s.clone()),
        Value::Blob(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => Json::from(s),
            Err(_) => json!({ "$base64": true, "encoded": BASE64.encode(bytes) }),
        },
    }
}

/// Encodes a row positionally, the shape used by the `.json` variant.
pub fn encode_row_positional(row: &[Value]) -> Json {
    Json::Array(row.iter().map(encode_value).collect())
}

/// Encodes a row as a `column -> value` object, the shape used by the
/// `.jsono` variant.
pub fn encode_row_object(columns: &[String], row: &[Value]) -> Json {
    Json::Object(
        columns
            .iter()
            .zip(row.iter())
            .map(|(c, v)| (c.clone(), encode_value(v)))
            .collect(),
    )
}

/// Encodes every row of an [`ExecutionResult`] in either the positional or
/// object shape, per the `.json` / `.jsono` distinction. `.jsono` only
/// promotes rows to objects when both `columns` and `rows` are non-empty;
/// an empty column list leaves rows untouched (this is underspecified for
/// custom-SQL responses and the existing behavior is preserved as-is).
pub fn encode_rows(result: &ExecutionResult, as_objects: bool) -> Json {
    if as_objects && !result.columns.is_empty() {
        Json::Array(
            result
                .rows
                .iter()
                .map(|row| encode_row_object(&result.columns, row))
                .collect(),
        )
    } else {
        Json::Array(result.rows.iter().map(|row| encode_row_positional(row)).collect())
    }
}
