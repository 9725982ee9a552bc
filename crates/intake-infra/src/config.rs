//! Configuration and catalog loading.
//!
//! Reads `config.toml` from the data directory (`~/.intake/` in production)
//! and deserializes it into [`IntakeConfig`]. A missing or malformed file
//! falls back to defaults. The question catalog is stricter: a configured
//! catalog file that cannot be read or validated is an error.

use std::path::{Path, PathBuf};

use intake_types::catalog::Catalog;
use intake_types::config::IntakeConfig;
use intake_types::error::CatalogError;

use crate::filesystem::config_path;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`IntakeConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> IntakeConfig {
    let config_path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return IntakeConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return IntakeConfig::default();
        }
    };

    match toml::from_str::<IntakeConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            IntakeConfig::default()
        }
    }
}

/// Resolve the catalog path; relative paths are taken from the data directory.
pub fn catalog_path(config: &IntakeConfig, data_dir: &Path) -> Option<PathBuf> {
    config.catalog.path.as_ref().map(|path| {
        if path.is_absolute() {
            path.clone()
        } else {
            data_dir.join(path)
        }
    })
}

/// Load the question catalog named by `[catalog] path`, or the built-in
/// therapy intake catalog when none is configured.
pub async fn load_catalog(config: &IntakeConfig, data_dir: &Path) -> Result<Catalog, CatalogError> {
    let Some(path) = catalog_path(config, data_dir) else {
        return Ok(Catalog::therapy_intake());
    };

    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;

    let catalog: Catalog = toml::from_str(&content)
        .map_err(|e| CatalogError::Parse(format!("{}: {e}", path.display())))?;

    tracing::debug!(
        path = %path.display(),
        steps = catalog.step_count(),
        questions = catalog.total_questions(),
        "loaded catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::config::StoreBackend;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config, IntakeConfig::default());
    }

    #[tokio::test]
    async fn load_config_valid_file() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
port = 8080
allowed_origin = "http://localhost:3000"

[store]
backend = "memory"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.allowed_origin.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config, IntakeConfig::default());
    }

    #[tokio::test]
    async fn load_catalog_defaults_to_therapy_intake() {
        let tmp = TempDir::new().unwrap();
        let catalog = load_catalog(&IntakeConfig::default(), tmp.path()).await.unwrap();
        assert_eq!(catalog, Catalog::therapy_intake());
    }

    #[tokio::test]
    async fn load_catalog_relative_to_data_dir() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("catalog.toml"),
            r#"
title = "Check-in"

[[steps]]
name = "Today"

[[steps.questions]]
prompt = "How are you feeling?"
"#,
        )
        .await
        .unwrap();

        let mut config = IntakeConfig::default();
        config.catalog.path = Some(PathBuf::from("catalog.toml"));

        let catalog = load_catalog(&config, tmp.path()).await.unwrap();
        assert_eq!(catalog.title(), "Check-in");
        assert_eq!(catalog.total_questions(), 1);
    }

    #[tokio::test]
    async fn load_catalog_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let mut config = IntakeConfig::default();
        config.catalog.path = Some(PathBuf::from("nope.toml"));

        let err = load_catalog(&config, tmp.path()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[tokio::test]
    async fn load_catalog_invalid_catalog_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("catalog.toml"), "steps = []")
            .await
            .unwrap();

        let mut config = IntakeConfig::default();
        config.catalog.path = Some(tmp.path().join("catalog.toml"));

        let err = load_catalog(&config, tmp.path()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn absolute_catalog_path_is_kept() {
        let mut config = IntakeConfig::default();
        config.catalog.path = Some(PathBuf::from("/etc/intake/catalog.toml"));
        assert_eq!(
            catalog_path(&config, Path::new("/home/user/.intake")),
            Some(PathBuf::from("/etc/intake/catalog.toml"))
        );
    }
}
