//! Configuration types for intake.
//!
//! `IntakeConfig` mirrors `config.toml` in the data directory. Every field has
//! a default, so a missing file or a partial file is always usable.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from `~/.intake/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Settings for `intake serve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin allowed by CORS. `None` allows any origin.
    #[serde(default)]
    pub allowed_origin: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3005
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: None,
        }
    }
}

/// Which store gateway the CLI and server talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local SQLite database in the data directory.
    #[default]
    Sqlite,
    /// A remote `intake serve` instance.
    Http,
    /// Process-local memory; lost on exit.
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Http => "http",
            StoreBackend::Memory => "memory",
        };
        f.write_str(s)
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "http" => Ok(StoreBackend::Http),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}' (expected sqlite, http or memory)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Base URL of the form server used by the `http` backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// SQLite URL. Defaults to `forms.db` in the data directory.
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:3005".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            base_url: default_base_url(),
            database_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML catalog file. The shipped therapy intake catalog is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
