//! Session store gateway trait.
//!
//! Defines the boundary to persistence. Implementations live in intake-infra
//! (SQLite, HTTP client, in-memory).

use std::future::Future;
use std::sync::Arc;

use intake_types::answer::Answers;
use intake_types::error::StoreError;
use intake_types::session::{SessionId, SessionRecord};

/// Persistence interface for questionnaire sessions.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait SessionStore: Send + Sync {
    /// All stored sessions in the store's natural order.
    ///
    /// The order is insertion order for the bundled stores, but callers must
    /// not rely on it being stable across implementations.
    fn list(&self) -> impl Future<Output = Result<Vec<SessionRecord>, StoreError>> + Send;

    /// Upsert the full answer mapping.
    ///
    /// With `id = None` a new record is always created and its freshly assigned
    /// id returned. With an id, the record's answers are overwritten in full
    /// (last write wins, no merge).
    fn create_or_update(
        &self,
        id: Option<&SessionId>,
        answers: &Answers,
    ) -> impl Future<Output = Result<SessionId, StoreError>> + Send;

    /// Fetch one session. `StoreError::NotFound` when the id is unknown.
    fn fetch(
        &self,
        id: &SessionId,
    ) -> impl Future<Output = Result<SessionRecord, StoreError>> + Send;

    /// Delete one session. `StoreError::NotFound` when nothing was deleted.
    fn delete(&self, id: &SessionId) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<S: SessionStore> SessionStore for Arc<S> {
    fn list(&self) -> impl Future<Output = Result<Vec<SessionRecord>, StoreError>> + Send {
        (**self).list()
    }

    fn create_or_update(
        &self,
        id: Option<&SessionId>,
        answers: &Answers,
    ) -> impl Future<Output = Result<SessionId, StoreError>> + Send {
        (**self).create_or_update(id, answers)
    }

    fn fetch(
        &self,
        id: &SessionId,
    ) -> impl Future<Output = Result<SessionRecord, StoreError>> + Send {
        (**self).fetch(id)
    }

    fn delete(&self, id: &SessionId) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).delete(id)
    }
}
