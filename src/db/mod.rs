//! Database layer - engine contract, SQLite backend, and the model façade

mod database;
mod engine;
mod model;
mod params;
mod row;
mod sqlite;
mod statement;

use indexmap::IndexMap;
use serde_json::Value;

/// Ordered column → value mapping for insert/update fields and predicates.
/// Binding order is the map's insertion order.
pub type FieldMap = IndexMap<String, Value>;

pub use database::Database;
pub use engine::Engine;
pub use model::{Model, Query};
pub use row::Row;
pub use sqlite::SqliteEngine;
