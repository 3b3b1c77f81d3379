//! Engine module - the contract every storage backend implements

use crate::config::DatabaseConfig;
use crate::db::{FieldMap, Row};
use crate::error::Result;

/// Storage backend contract: one pending statement at a time, accumulated
/// fragment by fragment and executed as a single parameterized statement.
///
/// Builder calls are order-sensitive. `begin_select`/`begin_update` start a
/// chain on an idle engine, `where_eq`/`limit` extend a pending one, and
/// `execute` compiles, runs, and clears it. Out-of-order calls surface as
/// [`Error::InvalidSequence`](crate::error::Error::InvalidSequence).
pub trait Engine: Send {
    /// Establishes the backend session. Callers must treat a failure as
    /// fatal for the process and never hand out a half-connected engine;
    /// see [`Database::open`](crate::db::Database::open).
    fn connect(config: &DatabaseConfig) -> Result<Self>
    where
        Self: Sized;

    /// Builds an INSERT for `fields` and immediately executes it.
    /// `Ok(true)` iff the driver reports rows affected.
    fn insert_row(&mut self, table: &str, fields: &FieldMap) -> Result<bool>;

    /// Starts an UPDATE chain. Must be the first call on an idle engine.
    fn begin_update(&mut self, table: &str, fields: &FieldMap) -> Result<()>;

    /// Starts a SELECT chain. Must be the first call on an idle engine.
    fn begin_select(&mut self, table: &str, columns: &[&str]) -> Result<()>;

    /// Appends equality predicates, ANDed together, to the pending statement.
    fn where_eq(&mut self, predicates: &FieldMap) -> Result<()>;

    /// Caps the number of returned/affected rows. Requires a pending statement.
    fn limit(&mut self, limit: u32) -> Result<()>;

    /// Compiles and runs the pending statement, captures rows for SELECTs,
    /// and clears the pending state. `Ok(false)` reports a driver-side run
    /// failure or zero affected rows; a prepare failure is an error and
    /// leaves the pending state in place.
    fn execute(&mut self) -> Result<bool>;

    /// Rows captured by the most recent SELECT execution; empty for
    /// non-SELECT statements or before any execution.
    fn last_result(&self) -> &[Row];
}
