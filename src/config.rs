//! Configuration loading and management.
//!
//! The daemon reads a single TOML file at startup:
//! - `[listen]`: HTTP listener address
//! - `[database]`: SQLite database path (optional, defaults to `chatqd.db`)
//! - `[cors]`: cross-origin policy (optional, defaults to permissive)

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP listen configuration.
    pub listen: ListenConfig,
    /// Database configuration.
    pub database: Option<DatabaseConfig>,
    /// Cross-origin policy for browser clients.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Database path, falling back to the default when `[database]` is absent.
    pub fn database_path(&self) -> &str {
        self.database
            .as_ref()
            .map(|d| d.path.as_str())
            .unwrap_or(DEFAULT_DATABASE_PATH)
    }
}

const DEFAULT_DATABASE_PATH: &str = "chatqd.db";

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to accept HTTP connections on (e.g., "127.0.0.1:8080").
    pub address: SocketAddr,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or ":memory:" for an ephemeral database.
    pub path: String,
}

/// Cross-origin resource sharing policy.
///
/// Each field is a list of allowed values; an absent field (or the whole
/// absent section) means "allow any". Values that fail to parse as origins,
/// methods, or headers are skipped at layer-construction time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins (e.g., `["https://chat.example.com"]`).
    pub origin: Option<Vec<String>>,
    /// Allowed request methods (e.g., `["GET", "POST", "PUT"]`).
    pub methods: Option<Vec<String>>,
    /// Allowed request headers (e.g., `["content-type"]`).
    pub headers: Option<Vec<String>>,
}
