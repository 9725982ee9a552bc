//! In-memory session store.
//!
//! Process-local and insertion-ordered. Used by `--store memory` and by tests
//! that need a real store without touching disk.

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use intake_core::gateway::SessionStore;
use intake_types::answer::Answers;
use intake_types::error::StoreError;
use intake_types::session::{SessionId, SessionRecord};

#[derive(Default)]
pub struct InMemorySessionStore {
    records: RwLock<Vec<SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    async fn list(&self) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self.records.read().await.clone())
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

        let mut records = self.records.write().await;
        let now = Utc::now();
        match records.iter_mut().find(|r| r.id == id) {
            Some(existing) => {
                existing.answers = answers.clone();
                existing.updated_at = Some(now);
            }
            None => records.push(SessionRecord {
                id: id.clone(),
                answers: answers.clone(),
                updated_at: Some(now),
            }),
        }

        Ok(id)
    }

    async fn fetch(&self, id: &SessionId) -> Result<SessionRecord, StoreError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::answer::AnswerKey;

    #[tokio::test]
    async fn upsert_fetch_delete() {
        let store = InMemorySessionStore::new();
        let mut data = Answers::new();
        data.set(AnswerKey::new(0, 0), "Alice");

        let id = store.create_or_update(None, &data).await.unwrap();
        assert_eq!(store.fetch(&id).await.unwrap().answers, data);

        data.set(AnswerKey::new(0, 1), "29");
        assert_eq!(store.create_or_update(Some(&id), &data).await.unwrap(), id);
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.fetch(&id).await.unwrap().answers.len(), 2);

        store.delete(&id).await.unwrap();
        assert_eq!(store.delete(&id).await, Err(StoreError::NotFound));
        assert_eq!(store.fetch(&id).await.unwrap_err(), StoreError::NotFound);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = InMemorySessionStore::new();
        let a = store.create_or_update(None, &Answers::new()).await.unwrap();
        let b = store.create_or_update(None, &Answers::new()).await.unwrap();
        store.create_or_update(Some(&a), &Answers::new()).await.unwrap();

        let ids: Vec<SessionId> = store.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, b]);
    }
}
