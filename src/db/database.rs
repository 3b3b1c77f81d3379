//! Database module - the connection provider handed through the model layer

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::DatabaseConfig;
use crate::db::Engine;
use crate::error::{Error, Result};

/// Shared handle to the one live engine of this process.
///
/// Constructed once at startup and cloned into every consumer; construction
/// fails fast when the backend cannot connect, so a broken engine is never
/// handed out. Keeping "at most one live connection per process" is the
/// caller's job: build one `Database` and clone the handle.
///
/// The mutex serializes whole statement chains, not just single calls:
/// model entry points take the guard at `select`/`update` and the query
/// chain holds it through `execute`.
#[derive(Clone)]
pub struct Database {
    engine: Arc<Mutex<dyn Engine>>,
}

impl Database {
    /// Connects the backend and wraps it for shared use.
    pub fn open<E: Engine + 'static>(config: &DatabaseConfig) -> Result<Self> {
        let engine = E::connect(config)?;
        Ok(Database {
            engine: Arc::new(Mutex::new(engine)),
        })
    }

    /// Locks the engine for one statement chain.
    pub fn lock(&self) -> Result<MutexGuard<'_, dyn Engine + 'static>> {
        self.engine.lock().map_err(|_| Error::Lock)
    }
}
