//! SQLite backend - implements the engine contract over rusqlite

use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::{debug, warn};

use crate::config::DatabaseConfig;
use crate::db::params::convert_params;
use crate::db::row::{collect_row, Row};
use crate::db::statement::Statement;
use crate::db::{Engine, FieldMap};
use crate::error::{Error, Result};

/// Engine over one live SQLite session.
///
/// Holds the single pending statement and the rows captured by the most
/// recent SELECT. Not internally synchronized; the connection provider
/// wraps it in a mutex and chains hold the lock end to end.
pub struct SqliteEngine {
    conn: Connection,
    statement: Statement,
    last_rows: Vec<Row>,
}

impl Engine for SqliteEngine {
    fn connect(config: &DatabaseConfig) -> Result<Self> {
        let name = config.name.as_deref().ok_or_else(|| Error::Connect {
            reason: "database.name is not configured".to_string(),
        })?;

        let conn = if name == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(name)
        }
        .map_err(|e| Error::Connect {
            reason: e.to_string(),
        })?;

        conn.execute_batch("PRAGMA foreign_keys = ON")
            .map_err(|e| Error::Connect {
                reason: e.to_string(),
            })?;

        Ok(SqliteEngine {
            conn,
            statement: Statement::new(),
            last_rows: Vec::new(),
        })
    }

    fn insert_row(&mut self, table: &str, fields: &FieldMap) -> Result<bool> {
        self.statement.insert(table, fields);
        self.execute()
    }

    fn begin_update(&mut self, table: &str, fields: &FieldMap) -> Result<()> {
        self.statement.update(table, fields)
    }

    fn begin_select(&mut self, table: &str, columns: &[&str]) -> Result<()> {
        self.statement.select(table, columns)
    }

    fn where_eq(&mut self, predicates: &FieldMap) -> Result<()> {
        self.statement.where_eq(predicates)
    }

    fn limit(&mut self, limit: u32) -> Result<()> {
        self.statement.limit(limit)
    }

    fn execute(&mut self) -> Result<bool> {
        let sql = self.statement.compile();
        debug!(%sql, "executing statement");

        let mut stmt = self.conn.prepare(&sql).map_err(|source| Error::Prepare {
            sql: sql.clone(),
            source,
        })?;

        let bound = convert_params(self.statement.params());
        let refs: Vec<&dyn ToSql> = bound.iter().map(|p| p.as_ref() as &dyn ToSql).collect();

        let mut captured = Vec::new();
        let run = if stmt.column_count() > 0 {
            let columns: Vec<String> =
                stmt.column_names().iter().map(|s| s.to_string()).collect();
            stmt.query(params_from_iter(refs)).and_then(|mut rows| {
                while let Some(row) = rows.next()? {
                    captured.push(collect_row(row, &columns));
                }
                Ok(true)
            })
        } else {
            stmt.execute(params_from_iter(refs)).map(|changes| changes > 0)
        };

        drop(stmt);
        self.last_rows = captured;
        self.statement.clear();

        match run {
            Ok(ok) => Ok(ok),
            Err(e) => {
                warn!(%sql, error = %e, "statement run failed");
                Ok(false)
            }
        }
    }

    fn last_result(&self) -> &[Row] {
        &self.last_rows
    }
}
