//! Model module - active-record style façade over the engine contract

use std::sync::MutexGuard;

use crate::db::{Database, Engine, FieldMap, Row};
use crate::error::Result;

/// Table binding for a concrete entity.
///
/// Implementors supply only the table name; the CRUD entry points are
/// provided. `update` and `select` return a [`Query`] for chaining, so the
/// usual shapes read:
///
/// ```ignore
/// VisitorRecord::select(&db, &["id", "views_count"])?
///     .where_eq(&predicates)?
///     .limit(1)?
///     .execute_with_result()?;
/// ```
pub trait Model {
    /// Table this entity maps to.
    fn table_name() -> &'static str;

    /// Inserts `fields` into the entity table. `Ok(false)` reports a
    /// driver-side failure, e.g. a uniqueness violation.
    fn insert(db: &Database, fields: &FieldMap) -> Result<bool> {
        let mut engine = db.lock()?;
        engine.insert_row(Self::table_name(), fields)
    }

    /// Starts an UPDATE chain for `fields`.
    fn update<'a>(db: &'a Database, fields: &FieldMap) -> Result<Query<'a>> {
        let mut engine = db.lock()?;
        engine.begin_update(Self::table_name(), fields)?;
        Ok(Query { engine })
    }

    /// Starts a SELECT chain over `columns`.
    fn select<'a>(db: &'a Database, columns: &[&str]) -> Result<Query<'a>> {
        let mut engine = db.lock()?;
        engine.begin_select(Self::table_name(), columns)?;
        Ok(Query { engine })
    }
}

/// One in-flight statement chain.
///
/// Owns the engine lock for its whole lifetime, so concurrent chains can
/// never interleave fragments into each other's statement.
pub struct Query<'a> {
    engine: MutexGuard<'a, dyn Engine + 'static>,
}

impl Query<'_> {
    /// Appends equality predicates, ANDed together.
    pub fn where_eq(mut self, predicates: &FieldMap) -> Result<Self> {
        self.engine.where_eq(predicates)?;
        Ok(self)
    }

    /// Caps the number of rows.
    pub fn limit(mut self, limit: u32) -> Result<Self> {
        self.engine.limit(limit)?;
        Ok(self)
    }

    /// Runs the chain; `Ok(false)` is a driver-reported failure.
    pub fn execute(mut self) -> Result<bool> {
        self.engine.execute()
    }

    /// Runs the chain and returns the captured rows; empty when the run
    /// failed or matched nothing.
    pub fn execute_with_result(mut self) -> Result<Vec<Row>> {
        if self.engine.execute()? {
            Ok(self.engine.last_result().to_vec())
        } else {
            Ok(Vec::new())
        }
    }
}
