//! Application state shared by the CLI commands and the HTTP handlers.
//!
//! The store backend is chosen at runtime (config file, then `--store` /
//! `--server` overrides), so `AppState` holds the enum-dispatched
//! [`AnyStore`] behind an `Arc`.

use std::path::PathBuf;
use std::sync::Arc;

use intake_core::controller::SessionController;
use intake_core::listing::{DeletePrompt, SessionListing};
use intake_infra::config::{load_catalog, load_config};
use intake_infra::filesystem::resolve_data_dir;
use intake_infra::store::AnyStore;
use intake_types::catalog::Catalog;
use intake_types::config::{IntakeConfig, StoreBackend, StoreConfig};

/// Command-line overrides for the `[store]` section of `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct StoreOverrides {
    pub backend: Option<StoreBackend>,
    pub server_url: Option<String>,
}

impl StoreOverrides {
    /// A server URL without an explicit backend implies the HTTP backend.
    pub fn apply(&self, store: &mut StoreConfig) {
        if let Some(url) = &self.server_url {
            store.base_url = url.clone();
            store.backend = StoreBackend::Http;
        }
        if let Some(backend) = self.backend {
            store.backend = backend;
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AnyStore>,
    pub catalog: Arc<Catalog>,
    pub config: Arc<IntakeConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data dir, load config and catalog, open the store.
    pub async fn init(overrides: &StoreOverrides) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        let mut config = load_config(&data_dir).await;
        overrides.apply(&mut config.store);

        let catalog = load_catalog(&config, &data_dir).await?;
        let store = AnyStore::open(&config.store, &data_dir).await?;

        Ok(Self::new(store, catalog, config, data_dir))
    }

    pub fn new(store: AnyStore, catalog: Catalog, config: IntakeConfig, data_dir: PathBuf) -> Self {
        Self {
            store: Arc::new(store),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            data_dir,
        }
    }

    pub fn controller(&self) -> SessionController<Arc<AnyStore>> {
        SessionController::new(self.store.clone(), self.catalog.clone())
    }

    pub fn listing<P: DeletePrompt>(&self, prompt: P) -> SessionListing<Arc<AnyStore>, P> {
        SessionListing::new(self.store.clone(), self.catalog.clone(), prompt)
    }
}
