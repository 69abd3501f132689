//! Server configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file
//! (`nodepop.toml` in the working directory or `--config <path>`), then
//! `NODEPOP__SECTION__KEY` environment variables. A `.env` file is loaded into
//! the environment first.

use clap::Parser;
use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::Rotation;

/// Command line of the `nodepop-server` binary.
#[derive(Debug, Parser)]
#[command(name = "nodepop-server", version, about = "Nodepop listings API server")]
pub struct Cli {
    /// Configuration file (TOML). Defaults to `nodepop.toml` when present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty disables CORS headers.
    pub cors_origins: Vec<String>,
    /// Request body limit in bytes.
    pub max_request_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
            max_request_body_size: 1024 * 1024,
        }
    }
}

/// Where listings are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; contents are lost on restart.
    #[default]
    Memory,
    Postgres,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    /// PostgreSQL connection URL; required for the postgres backend.
    pub url: Option<String>,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
    /// Per-statement limit applied to every pooled connection. 0 disables it.
    pub statement_timeout_seconds: u64,
    /// Apply bundled migrations at startup.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: None,
            pool_max_size: 10,
            pool_timeout_seconds: 30,
            statement_timeout_seconds: 30,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for nodepop crates when `RUST_LOG` is unset.
    pub level: String,
    /// JSON lines instead of human-readable output.
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// `daily`, `hourly`, `minutely` or `never`.
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "nodepop".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn rotation(&self) -> Option<Rotation> {
        match self.file_rotation.to_ascii_lowercase().as_str() {
            "daily" => Some(Rotation::DAILY),
            "hourly" => Some(Rotation::HOURLY),
            "minutely" => Some(Rotation::MINUTELY),
            "never" => Some(Rotation::NEVER),
            _ => None,
        }
    }
}

impl Config {
    /// Load from `path`, or from `nodepop.toml` when present, then apply the
    /// environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("nodepop").required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("NODEPOP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be greater than 0".to_string());
        }
        if self.server.max_request_body_size == 0 {
            return Err("server.max_request_body_size must be greater than 0".to_string());
        }
        if self.database.backend == StorageBackend::Postgres {
            let url = self.database.url.as_deref().unwrap_or("").trim();
            if url.is_empty() {
                return Err("database.url is required for the postgres backend".to_string());
            }
            if self.database.pool_max_size == 0 {
                return Err("database.pool_max_size must be greater than 0".to_string());
            }
        }
        if self.logging.rotation().is_none() {
            return Err(format!(
                "logging.file_rotation must be daily, hourly, minutely or never, got '{}'",
                self.logging.file_rotation
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let mut addrs = (self.server.host.as_str(), self.server.port).to_socket_addrs()?;
        addrs.next().ok_or_else(|| {
            anyhow::anyhow!(
                "{}:{} does not resolve to an address",
                self.server.host,
                self.server.port
            )
        })
    }
}
