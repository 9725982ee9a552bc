use thiserror::Error;

use crate::catalog::QuestionRole;

/// Errors from parsing an answer key token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerKeyError {
    #[error("malformed answer key '{0}': expected '<step>-<question>'")]
    Malformed(String),

    #[error("answer key '{0}' has an index that does not fit in usize")]
    Overflow(String),
}

/// Errors from building or loading a question catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no steps")]
    NoSteps,

    #[error("step {index} ('{name}') has no questions")]
    EmptyStep { index: usize, name: String },

    #[error("role '{0:?}' is assigned to more than one question")]
    DuplicateRole(QuestionRole),

    #[error("failed to read catalog: {0}")]
    Io(String),

    #[error("failed to parse catalog: {0}")]
    Parse(String),
}

/// Errors surfaced by a session store gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session not found")]
    NotFound,

    #[error("store unreachable: {0}")]
    Transport(String),

    #[error("stored session is unreadable: {0}")]
    Corrupt(String),
}

/// Errors from session controller operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("store unreachable: {0}")]
    Transport(String),

    #[error("question {question} does not exist on step {step}")]
    QuestionOutOfRange { step: usize, question: usize },

    #[error("session already saved as '{current}', store returned '{returned}'")]
    IdentityConflict { current: String, returned: String },

    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => SessionError::NotFound,
            StoreError::Transport(msg) => SessionError::Transport(msg),
            other => SessionError::Store(other.to_string()),
        }
    }
}

/// Errors from repository operations (SQL level, mapped to `StoreError` at the gateway).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

impl From<RepositoryError> for StoreError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => StoreError::NotFound,
            RepositoryError::Connection => StoreError::Transport("database connection error".into()),
            RepositoryError::Query(msg) => StoreError::Transport(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_key_error_display() {
        let err = AnswerKeyError::Malformed("1-2-3".to_string());
        assert_eq!(
            err.to_string(),
            "malformed answer key '1-2-3': expected '<step>-<question>'"
        );
    }

    #[test]
    fn test_store_error_maps_to_session_error() {
        assert_eq!(SessionError::from(StoreError::NotFound), SessionError::NotFound);
        assert_eq!(
            SessionError::from(StoreError::Transport("down".into())),
            SessionError::Transport("down".into())
        );
        assert!(matches!(
            SessionError::from(StoreError::Corrupt("bad json".into())),
            SessionError::Store(_)
        ));
    }

    #[test]
    fn test_repository_error_maps_to_store_error() {
        let err = StoreError::from(RepositoryError::Query("syntax error".to_string()));
        assert_eq!(err, StoreError::Transport("syntax error".to_string()));
    }
}
