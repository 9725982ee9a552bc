use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::answer::{AnswerKey, Answers};
use crate::error::SessionError;

/// Opaque session identifier assigned by the store on first save.
///
/// The server mints UUID v7 strings, but nothing outside the store relies on
/// that shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One respondent's answers plus its persistence identifier.
///
/// A session without an id is an unsaved draft. The id is adopted exactly once,
/// from the store's response to the first save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub id: Option<SessionId>,
    pub answers: Answers,
}

impl Session {
    /// A fresh, unidentified draft with no answers.
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn persisted(id: SessionId, answers: Answers) -> Self {
        Self {
            id: Some(id),
            answers,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    pub fn get_answer(&self, step: usize, question: usize) -> &str {
        self.answers.get(&AnswerKey::new(step, question))
    }

    /// Replace one answer. No validation: any text, including empty, is kept.
    pub fn set_answer(&mut self, step: usize, question: usize, text: impl Into<String>) {
        self.answers.set(AnswerKey::new(step, question), text);
    }

    /// Builder-style variant of [`Session::set_answer`].
    pub fn with_answer(mut self, step: usize, question: usize, text: impl Into<String>) -> Self {
        self.set_answer(step, question, text);
        self
    }

    /// Take the store-assigned id after the first save.
    ///
    /// Re-adopting the id already held is a no-op. Adopting a different id
    /// once identified means the store created a second record for this
    /// session and is rejected.
    pub fn adopt_id(&mut self, id: SessionId) -> Result<(), SessionError> {
        match &self.id {
            None => {
                self.id = Some(id);
                Ok(())
            }
            Some(current) if *current == id => Ok(()),
            Some(current) => Err(SessionError::IdentityConflict {
                current: current.to_string(),
                returned: id.to_string(),
            }),
        }
    }
}

/// A session as held by the store.
///
/// `updated_at` is `None` when the store does not report one (a remote
/// server sending only `{uuid, data}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub answers: Answers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        Session::persisted(record.id, record.answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_roundtrips() {
        let mut session = Session::draft();
        session.set_answer(2, 0, "yes");
        assert_eq!(session.get_answer(2, 0), "yes");
    }

    #[test]
    fn set_leaves_other_keys_untouched() {
        let before = Session::draft()
            .with_answer(0, 0, "Alice")
            .with_answer(0, 1, "29");
        let after = before.clone().with_answer(0, 1, "30");

        assert_eq!(after.get_answer(0, 0), before.get_answer(0, 0));
        assert_eq!(after.get_answer(1, 0), before.get_answer(1, 0));
        assert_eq!(after.get_answer(0, 1), "30");
    }

    #[test]
    fn empty_text_is_stored() {
        let session = Session::draft().with_answer(0, 0, "");
        assert_eq!(session.answers.len(), 1);
        assert_eq!(session.get_answer(0, 0), "");
    }

    #[test]
    fn adopt_id_once() {
        let mut session = Session::draft();
        assert!(session.is_draft());
        session.adopt_id(SessionId::from("abc-123")).unwrap();
        assert_eq!(session.id, Some(SessionId::from("abc-123")));

        session.adopt_id(SessionId::from("abc-123")).unwrap();
        let err = session.adopt_id(SessionId::from("other")).unwrap_err();
        assert!(matches!(err, SessionError::IdentityConflict { .. }));
        assert_eq!(session.id, Some(SessionId::from("abc-123")));
    }
}
