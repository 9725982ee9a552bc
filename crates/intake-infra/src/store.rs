//! Runtime selection of the session store.
//!
//! `SessionStore` uses `impl Future` returns and is not object-safe, so the
//! configured backend is picked with an enum and dispatched by `match`.

use intake_core::gateway::SessionStore;
use intake_types::answer::Answers;
use intake_types::config::{StoreBackend, StoreConfig};
use intake_types::error::StoreError;
use intake_types::session::{SessionId, SessionRecord};

use std::path::Path;

use crate::filesystem::ensure_data_dir;
use crate::http::HttpSessionStore;
use crate::memory::InMemorySessionStore;
use crate::sqlite::form::SqliteSessionStore;
use crate::sqlite::pool::{default_database_url, DatabasePool};

pub enum AnyStore {
    Sqlite(SqliteSessionStore),
    Http(HttpSessionStore),
    Memory(InMemorySessionStore),
}

impl AnyStore {
    /// Open the backend named by `config.backend`.
    ///
    /// The SQLite backend creates the data directory and runs migrations.
    pub async fn open(config: &StoreConfig, data_dir: &Path) -> Result<Self, StoreError> {
        let store = match config.backend {
            StoreBackend::Sqlite => {
                let url = match &config.database_url {
                    Some(url) => url.clone(),
                    None => {
                        ensure_data_dir(data_dir).await.map_err(|e| {
                            StoreError::Transport(format!(
                                "failed to create {}: {e}",
                                data_dir.display()
                            ))
                        })?;
                        default_database_url(data_dir)
                    }
                };
                let pool = DatabasePool::new(&url)
                    .await
                    .map_err(|e| StoreError::Transport(format!("failed to open database: {e}")))?;
                AnyStore::Sqlite(SqliteSessionStore::new(pool))
            }
            StoreBackend::Http => AnyStore::Http(HttpSessionStore::new(&config.base_url)?),
            StoreBackend::Memory => AnyStore::Memory(InMemorySessionStore::new()),
        };

        tracing::debug!(backend = %store.backend(), "session store opened");
        Ok(store)
    }

    pub fn backend(&self) -> StoreBackend {
        match self {
            AnyStore::Sqlite(_) => StoreBackend::Sqlite,
            AnyStore::Http(_) => StoreBackend::Http,
            AnyStore::Memory(_) => StoreBackend::Memory,
        }
    }
}

impl SessionStore for AnyStore {
    async fn list(&self) -> Result<Vec<SessionRecord>, StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.list().await,
            AnyStore::Http(s) => s.list().await,
            AnyStore::Memory(s) => s.list().await,
        }
    }

    async fn create_or_update(
        &self,
        id: Option<&SessionId>,
        answers: &Answers,
    ) -> Result<SessionId, StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.create_or_update(id, answers).await,
            AnyStore::Http(s) => s.create_or_update(id, answers).await,
            AnyStore::Memory(s) => s.create_or_update(id, answers).await,
        }
    }

    async fn fetch(&self, id: &SessionId) -> Result<SessionRecord, StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.fetch(id).await,
            AnyStore::Http(s) => s.fetch(id).await,
            AnyStore::Memory(s) => s.fetch(id).await,
        }
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.delete(id).await,
            AnyStore::Http(s) => s.delete(id).await,
            AnyStore::Memory(s) => s.delete(id).await,
        }
    }
}
