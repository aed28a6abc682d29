//! CLI command implementations.
//!
//! Every command returns the JSON value the binary prints.

pub mod find;
pub mod write;

use recordkit_core::{Fields, Record};
use serde_json::Value;

/// Parses a command-line argument as a JSON object.
pub fn parse_fields(arg: &str) -> Result<Fields, String> {
    match serde_json::from_str(arg) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(format!("expected a JSON object, got {other}")),
        Err(err) => Err(err.to_string()),
    }
}

/// Parses a command-line argument as a JSON value, falling back to a bare
/// string so `--id abc` works without quoting.
pub fn parse_value(arg: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_owned())))
}

fn render(record: Record) -> Value {
    Value::Object(record.into_fields())
}

fn render_all(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(render).collect())
}
