//! In-process store used by the controller and listing tests.

use std::sync::Mutex;

use chrono::Utc;

use intake_types::answer::Answers;
use intake_types::error::StoreError;
use intake_types::session::{SessionId, SessionRecord};

use crate::gateway::SessionStore;

#[derive(Default)]
struct Inner {
    records: Vec<SessionRecord>,
    saved: Vec<(Option<SessionId>, Answers)>,
    next_id: u32,
    fail_next: bool,
    fail_deletes: bool,
}

/// Insertion-ordered store that records every upsert and can inject failures.
pub struct RecordingStore {
    inner: Mutex<Inner>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Make the next call of any kind fail with `StoreError::Transport`.
    pub fn fail_next_with_transport(&self) {
        self.inner.lock().unwrap().fail_next = true;
    }

    /// Make every delete fail with `StoreError::Transport` until cleared.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_deletes = fail;
    }

    pub fn record_count(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }

    pub fn saved_payloads(&self) -> Vec<(Option<SessionId>, Answers)> {
        self.inner.lock().unwrap().saved.clone()
    }

    /// Insert a record directly, bypassing the upsert path.
    pub fn seed(&self, id: &str, answers: Answers) {
        self.inner.lock().unwrap().records.push(SessionRecord {
            id: SessionId::from(id),
            answers,
            updated_at: Some(Utc::now()),
        });
    }

    fn take_failure(inner: &mut Inner) -> Result<(), StoreError> {
        if std::mem::take(&mut inner.fail_next) {
            return Err(StoreError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

impl SessionStore for RecordingStore {
    async fn list(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner)?;
        Ok(inner.records.clone())
    }

    async fn create_or_update(
        &self,
        id: Option<&SessionId>,
        answers: &Answers,
    ) -> Result<SessionId, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner)?;
        inner.saved.push((id.cloned(), answers.clone()));

        let id = match id {
            Some(id) => id.clone(),
            None => {
                inner.next_id += 1;
                SessionId::new(format!("session-{}", inner.next_id))
            }
        };

        let now = Utc::now();
        match inner.records.iter_mut().find(|r| r.id == id) {
            Some(existing) => {
                existing.answers = answers.clone();
                existing.updated_at = Some(now);
            }
            None => inner.records.push(SessionRecord {
                id: id.clone(),
                answers: answers.clone(),
                updated_at: Some(now),
            }),
        }
        Ok(id)
    }

    async fn fetch(&self, id: &SessionId) -> Result<SessionRecord, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner)?;
        inner
            .records
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner)?;
        if inner.fail_deletes {
            return Err(StoreError::Transport("connection reset".to_string()));
        }
        let before = inner.records.len();
        inner.records.retain(|r| &r.id != id);
        if inner.records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
