use crate::Value;

/// The materialized result of one `execute` call: column names in statement
/// order, plus every row, eagerly read off the cursor before the worker
/// replies.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}
