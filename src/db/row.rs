//! Row module - converts SQLite rows into ordered column/value records

use indexmap::IndexMap;
use rusqlite::Row as SqliteRow;
use serde_json::{Number, Value};

/// Ordered mapping of column name to cell value for one result row.
pub type Row = IndexMap<String, Value>;

/// Convert one SQLite column value with proper type handling.
pub fn sqlite_to_value(row: &SqliteRow, i: usize) -> Value {
    match row.get_ref(i) {
        Ok(rusqlite::types::ValueRef::Null) => Value::Null,
        Ok(rusqlite::types::ValueRef::Integer(i)) => Value::Number(i.into()),
        Ok(rusqlite::types::ValueRef::Real(f)) => {
            Value::Number(Number::from_f64(f).unwrap_or(Number::from(0)))
        }
        Ok(rusqlite::types::ValueRef::Text(t)) => {
            Value::String(String::from_utf8_lossy(t).into_owned())
        }
        Ok(rusqlite::types::ValueRef::Blob(b)) => Value::String(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        _ => Value::Null,
    }
}

/// Materialize one result row in column order.
pub fn collect_row(row: &SqliteRow, columns: &[String]) -> Row {
    columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), sqlite_to_value(row, i)))
        .collect()
}
