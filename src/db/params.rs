//! Params module - converts tagged values into SQLite bind parameters

use rusqlite::ToSql;
use serde_json::Value;

/// Convert bind values to SQLite parameters.
///
/// The wire type follows the value variant: integer numbers bind as INTEGER,
/// other numbers as REAL, strings as TEXT, null as NULL. The mapping must
/// stay exact or the driver starts coercing types on its own.
pub fn convert_params(values: &[Value]) -> Vec<Box<dyn ToSql + Send>> {
    values.iter().map(convert_single_param).collect()
}

/// Convert a single value to a SQLite parameter.
pub fn convert_single_param(v: &Value) -> Box<dyn ToSql + Send> {
    match v {
        Value::Null => Box::new(rusqlite::types::Null) as Box<dyn ToSql + Send>,
        Value::Bool(b) => Box::new(*b) as Box<dyn ToSql + Send>,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Box::new(i) as Box<dyn ToSql + Send>
            } else {
                Box::new(n.as_f64().unwrap_or(0.0)) as Box<dyn ToSql + Send>
            }
        }
        Value::String(s) => Box::new(s.clone()) as Box<dyn ToSql + Send>,
        Value::Array(arr) => {
            Box::new(serde_json::to_string(arr).unwrap_or_default()) as Box<dyn ToSql + Send>
        }
        Value::Object(obj) => {
            Box::new(serde_json::to_string(obj).unwrap_or_default()) as Box<dyn ToSql + Send>
        }
    }
}
