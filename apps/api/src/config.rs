//! # Server Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VENTAS_BIND_ADDR, VENTAS_PORT, VENTAS_STORAGE,                     │
//! │     VENTAS_DATABASE_PATH, VENTAS_MAX_CONNECTIONS                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     first CLI argument, or $VENTAS_CONFIG                              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [storage]
//! backend = "sqlite"          # sqlite | memory
//! database_path = "ventas.db"
//! max_connections = 5
//! seed_demo_catalog = true
//!
//! [logging]
//! filter = "info,ventas_api=debug,ventas_db=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Storage Backend
// =============================================================================

/// Which store backs the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// SQLite file, survives restarts.
    #[default]
    Sqlite,

    /// Process memory, lost on exit.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "db" => Ok(StorageBackend::Sqlite),
            "memory" | "mem" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid(format!(
                "Unknown storage backend: '{}'. Valid options: sqlite, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite file, created if missing. Ignored by the memory backend.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Fill an empty catalog with the demo products on startup.
    #[serde(default = "default_true")]
    pub seed_demo_catalog: bool,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("ventas.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            database_path: default_database_path(),
            max_connections: default_max_connections(),
            seed_demo_catalog: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,ventas_api=debug,ventas_db=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,

    /// `VENTAS_*` variables that were set but could not be used.
    #[serde(skip)]
    pub ignored_overrides: Vec<String>,
}

impl ApiConfig {
    /// Loads configuration: file (if any), then environment, then validation.
    ///
    /// A path that was given explicitly must exist. Loading runs before the
    /// tracing subscriber exists, so nothing is logged here; the caller
    /// reports [`source`](Self::source) and
    /// [`ignored_overrides`](Self::ignored_overrides) once logging is up.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path.or_else(|| std::env::var_os("VENTAS_CONFIG").map(PathBuf::from));
        let mut config = match &path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.source = path;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file. Missing sections and keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind_addr must not be empty".into()));
        }

        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_connections must be greater than 0".into(),
            ));
        }

        if self.storage.backend == StorageBackend::Sqlite
            && self.storage.database_path.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "storage.database_path is required for the sqlite backend".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `VENTAS_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("VENTAS_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("VENTAS_PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => self.ignored_overrides.push(format!("VENTAS_PORT={port}")),
            }
        }

        if let Some(backend) = lookup("VENTAS_STORAGE") {
            match backend.parse() {
                Ok(parsed) => self.storage.backend = parsed,
                Err(_) => self.ignored_overrides.push(format!("VENTAS_STORAGE={backend}")),
            }
        }

        if let Some(path) = lookup("VENTAS_DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }

        if let Some(max) = lookup("VENTAS_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(m) => self.storage.max_connections = m,
                Err(_) => self
                    .ignored_overrides
                    .push(format!("VENTAS_MAX_CONNECTIONS={max}")),
            }
        }
    }
}
