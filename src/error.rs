use thiserror::Error;

/// Errors surfaced by the database layer and the service glue.
///
/// Builder-ordering violations and connection/prepare failures are the
/// "never silently continue" tier: callers are expected to abort the request
/// they belong to. Driver-side run failures are not errors at all; they
/// come back as `Ok(false)` / empty results.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid statement sequence: {0}")]
    InvalidSequence(&'static str),

    #[error("error connecting to database: {reason}")]
    Connect { reason: String },

    #[error("failed to prepare `{sql}`: {source}")]
    Prepare {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("engine lock poisoned")]
    Lock,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
