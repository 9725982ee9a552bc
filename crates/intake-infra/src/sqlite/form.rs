//! SQLite session store.
//!
//! Implements `SessionStore` from `intake-core` on the `forms` table. The
//! answer mapping is stored as JSON text and fully overwritten on every save.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use intake_core::gateway::SessionStore;
use intake_types::answer::Answers;
use intake_types::error::{RepositoryError, StoreError};
use intake_types::session::{SessionId, SessionRecord};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionStore`.
pub struct SqliteSessionStore {
    pool: DatabasePool,
}

impl SqliteSessionStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct FormRow {
    uuid: String,
    data: String,
    updated_at: String,
}

impl FormRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            data: row.try_get("data")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_record(self) -> Result<SessionRecord, StoreError> {
        let answers: Answers = serde_json::from_str(&self.data)
            .map_err(|e| StoreError::Corrupt(format!("form {}: {e}", self.uuid)))?;
        let updated_at = parse_datetime(&self.updated_at)?;

        Ok(SessionRecord {
            id: SessionId::new(self.uuid),
            answers,
            updated_at: Some(updated_at),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("invalid datetime: {e}")))
}

fn query_error(e: sqlx::Error) -> StoreError {
    RepositoryError::Query(e.to_string()).into()
}

// ---------------------------------------------------------------------------
// SessionStore implementation
// ---------------------------------------------------------------------------

impl SessionStore for SqliteSessionStore {
    async fn list(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let rows = sqlx::query("SELECT uuid, data, updated_at FROM forms ORDER BY rowid")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let form = FormRow::from_row(row).map_err(query_error)?;
            match form.into_record() {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "skipping unreadable form"),
            }
        }

        Ok(records)
    }

    async fn create_or_update(
        &self,
        id: Option<&SessionId>,
        answers: &Answers,
    ) -> Result<SessionId, StoreError> {
        let id = match id {
            Some(id) => id.clone(),
            None => SessionId::new(Uuid::now_v7().to_string()),
        };
        let now = Utc::now().to_rfc3339();
        let data = serde_json::to_string(answers)
            .map_err(|e| StoreError::Corrupt(format!("failed to serialize answers: {e}")))?;

        sqlx::query(
            r#"INSERT INTO forms (uuid, data, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (uuid) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at"#,
        )
        .bind(id.as_str())
        .bind(&data)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(id)
    }

    async fn fetch(&self, id: &SessionId) -> Result<SessionRecord, StoreError> {
        let row = sqlx::query("SELECT uuid, data, updated_at FROM forms WHERE uuid = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => FormRow::from_row(&row).map_err(query_error)?.into_record(),
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM forms WHERE uuid = ?")
            .bind(id.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
