//! Listing of stored sessions.
//!
//! [`SessionListing`] owns a cache of summaries (title + progress per stored
//! session). The cache is only rebuilt by [`SessionListing::refresh`], an
//! idempotent re-sync with the store, and only shrinks on a confirmed,
//! successful delete.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use intake_types::catalog::Catalog;
use intake_types::error::{SessionError, StoreError};
use intake_types::session::{SessionId, SessionRecord};

use crate::gateway::SessionStore;
use crate::progress::{display_title, Progress};

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub progress: Progress,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    pub fn from_record(catalog: &Catalog, record: &SessionRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: display_title(catalog, &record.answers),
            progress: Progress::evaluate(catalog, &record.answers),
            updated_at: record.updated_at,
        }
    }
}

/// Synchronous yes/no confirmation asked before a delete reaches the store.
pub trait DeletePrompt {
    fn confirm_delete(&self, entry: &SessionSummary) -> bool;
}

impl<F> DeletePrompt for F
where
    F: Fn(&SessionSummary) -> bool,
{
    fn confirm_delete(&self, entry: &SessionSummary) -> bool {
        self(entry)
    }
}

/// Prompt that approves every delete (`--force`).
pub struct AlwaysConfirm;

impl DeletePrompt for AlwaysConfirm {
    fn confirm_delete(&self, _entry: &SessionSummary) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent to the store.
    Cancelled,
    Deleted,
    /// The store no longer had the session. The stale row was dropped.
    AlreadyGone,
}

pub struct SessionListing<S: SessionStore, P: DeletePrompt> {
    store: S,
    catalog: Arc<Catalog>,
    prompt: P,
    entries: Vec<SessionSummary>,
    degraded: bool,
}

impl<S: SessionStore, P: DeletePrompt> SessionListing<S, P> {
    pub fn new(store: S, catalog: Arc<Catalog>, prompt: P) -> Self {
        Self {
            store,
            catalog,
            prompt,
            entries: Vec::new(),
            degraded: false,
        }
    }

    /// Replace the cache with the store's current contents.
    ///
    /// A store failure is logged and leaves an empty, degraded listing rather
    /// than an error: the listing must always be renderable.
    pub async fn refresh(&mut self) -> &[SessionSummary] {
        match self.store.list().await {
            Ok(records) => {
                self.entries = records
                    .iter()
                    .map(|r| SessionSummary::from_record(&self.catalog, r))
                    .collect();
                self.degraded = false;
                tracing::debug!(count = self.entries.len(), "session listing refreshed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to list sessions, showing an empty list");
                self.entries.clear();
                self.degraded = true;
            }
        }
        &self.entries
    }

    pub fn entries(&self) -> &[SessionSummary] {
        &self.entries
    }

    /// Whether the last refresh failed and the list is empty for that reason.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn find(&self, id: &SessionId) -> Option<&SessionSummary> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Delete a listed session after confirmation.
    ///
    /// The row is removed from the cache only once the store reports success
    /// (or reports that the session is already gone). Transport failures leave
    /// the row in place and are returned.
    pub async fn delete(&mut self, id: &SessionId) -> Result<DeleteOutcome, SessionError> {
        if self.find(id).is_none() {
            self.refresh().await;
        }
        let entry = self.find(id).ok_or(SessionError::NotFound)?;

        if !self.prompt.confirm_delete(entry) {
            tracing::debug!(session_id = %id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let outcome = match self.store.delete(id).await {
            Ok(()) => DeleteOutcome::Deleted,
            Err(StoreError::NotFound) => DeleteOutcome::AlreadyGone,
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "delete failed, keeping entry");
                return Err(e.into());
            }
        };

        self.entries.retain(|e| &e.id != id);
        tracing::info!(session_id = %id, ?outcome, "session removed from listing");
        Ok(outcome)
    }
}
