//! Configuration loading from a TOML file.
//!
//! ## Example bannerd.toml
//!
//! ```toml
//! [database]
//! name = "advert.db"
//!
//! [banners]
//! path = "banners/"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub banners: BannersConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Connection settings. All keys are optional and default to absent; the
/// SQLite backend requires `name` (the database path) and refuses to connect
/// without it. `host`/`user`/`pass` are accepted for server-style backends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BannersConfig {
    /// Directory the banner files live in, relative to the document root.
    #[serde(default = "default_banners_path")]
    pub path: String,
}

impl Default for BannersConfig {
    fn default() -> Self {
        Self {
            path: default_banners_path(),
        }
    }
}

fn default_banners_path() -> String {
    "banners/".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            [database]
            host = "localhost"
            user = "adv"
            pass = "secret"
            name = "advert.db"

            [banners]
            path = "static/banners/"

            [server]
            bind = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.name.as_deref(), Some("advert.db"));
        assert_eq!(config.database.host.as_deref(), Some("localhost"));
        assert_eq!(config.banners.path, "static/banners/");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.database.name.is_none());
        assert_eq!(config.banners.path, "banners/");
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn missing_database_keys_default_to_none() {
        let config: Config = toml::from_str("[database]\nname = \"x.db\"\n").unwrap();

        assert_eq!(config.database.name.as_deref(), Some("x.db"));
        assert!(config.database.host.is_none());
        assert!(config.database.user.is_none());
        assert!(config.database.pass.is_none());
    }
}
