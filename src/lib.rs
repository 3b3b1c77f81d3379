pub mod config;
pub mod db;
pub mod error;
pub mod files;
pub mod visitor;

pub use config::Config;
pub use db::{Database, Engine, FieldMap, Model, Query, Row, SqliteEngine};
pub use error::{Error, Result};
pub use visitor::{Visitor, VisitorRecord};
