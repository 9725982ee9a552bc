//! SQLite connection pools for the form store.
//!
//! Saves and deletes go through a single writer connection so two upserts of
//! the same form never interleave. Listing and resume reads use a small
//! read-only pool that WAL lets run alongside the writer.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::filesystem::database_path;

/// Read connections kept open. One interactive user rarely needs more than a
/// listing and a fetch at once; the server shares them across requests.
const READ_CONNECTIONS: u32 = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the writer, apply the `forms` migrations, then open the readers.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;

        // Readers are read-only, so the schema must exist first.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READ_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }

    pub async fn close(&self) {
        self.reader.close().await;
        self.writer.close().await;
    }
}

/// `sqlite://{data_dir}/forms.db?mode=rwc`
pub fn default_database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", database_path(data_dir).display())
}
