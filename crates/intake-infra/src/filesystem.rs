//! Data directory layout.
//!
//! Everything intake persists lives under one directory:
//!
//! ```text
//! ~/.intake/
//!   config.toml    optional, see `config::load_config`
//!   catalog.toml   optional question catalog
//!   forms.db       SQLite store
//! ```

use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "INTAKE_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `INTAKE_DATA_DIR` environment variable
/// 2. `~/.intake`
/// 3. `.intake` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok())
}

fn data_dir_from(env_value: Option<String>) -> PathBuf {
    if let Some(dir) = env_value.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".intake");
    }

    PathBuf::from(".intake")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(data_dir).await
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("forms.db")
}
