/// A single column value read back from the engine. Distinct from
/// `rusqlite::types::Value` so that text columns can follow this system's
/// own decoding rule (UTF-8 with replacement on invalid sequences) rather
/// than rusqlite's default, which rejects invalid UTF-8 outright.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn from_ref(value_ref: rusqlite::types::ValueRef<'_>) -> Self {
        use rusqlite::types::ValueRef;
        match value_ref {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::Integer(n),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }

    /// Renders the value the way it would appear in a cursor component or a
    /// simple text context: `Null` becomes the empty string, text and
    /// integers render plainly, blobs render as lossily-decoded text.
    pub fn to_cursor_component(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(n) => n.to_string(),
            Value::Real(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}
