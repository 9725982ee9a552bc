//! Session controller.
//!
//! Orchestrates one questionnaire session: resuming from the store, stepping
//! through the catalog, editing answers on the current step, and saving.
//!
//! All mutable state lives in an explicit [`FormState`] (session + cursor), so
//! transitions can be inspected and tested without a store round-trip.

use std::sync::Arc;

use intake_types::catalog::{Catalog, Question, Step};
use intake_types::error::SessionError;
use intake_types::session::{Session, SessionId};

use crate::cursor::Cursor;
use crate::gateway::SessionStore;
use crate::progress::{self, Progress};

/// Everything that changes while a user fills out a questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub session: Session,
    pub cursor: Cursor,
}

impl FormState {
    /// Unidentified draft positioned on the first step.
    pub fn fresh(catalog: &Catalog) -> Self {
        Self {
            session: Session::draft(),
            cursor: Cursor::for_catalog(catalog),
        }
    }

    /// A loaded session, always starting back on the first step.
    pub fn loaded(catalog: &Catalog, session: Session) -> Self {
        Self {
            session,
            cursor: Cursor::for_catalog(catalog),
        }
    }
}

/// Drives a single session against a [`SessionStore`].
pub struct SessionController<S: SessionStore> {
    store: S,
    catalog: Arc<Catalog>,
    state: FormState,
}

impl<S: SessionStore> SessionController<S> {
    /// Start a new, unsaved questionnaire.
    pub fn new(store: S, catalog: Arc<Catalog>) -> Self {
        let state = FormState::fresh(&catalog);
        Self {
            store,
            catalog,
            state,
        }
    }

    /// Fetch `id` from the store and replace the in-memory state wholesale.
    ///
    /// On any failure the controller falls back to a fresh draft, so no stale
    /// or partial state from a previous session remains visible. The caller
    /// decides how to tell the user; the error is never retried here.
    pub async fn load(&mut self, id: &SessionId) -> Result<(), SessionError> {
        match self.store.fetch(id).await {
            Ok(record) => {
                tracing::debug!(session_id = %id, answers = record.answers.len(), "session loaded");
                self.state = FormState::loaded(&self.catalog, record.into());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "could not resume session, starting a new one");
                self.state = FormState::fresh(&self.catalog);
                Err(e.into())
            }
        }
    }

    /// Discard the in-memory session and begin a new draft.
    pub fn start_new(&mut self) {
        self.state = FormState::fresh(&self.catalog);
    }

    pub fn back(&mut self) -> usize {
        self.state.cursor.back()
    }

    pub fn next(&mut self) -> usize {
        self.state.cursor.next()
    }

    /// Replace the answer to `question` on the current step.
    ///
    /// `question` must be a valid index for the current step; anything else is
    /// a caller bug and is rejected without touching the session.
    pub fn edit_answer(&mut self, question: usize, text: impl Into<String>) -> Result<(), SessionError> {
        let step = self.state.cursor.index();
        if question >= self.current_step().questions.len() {
            return Err(SessionError::QuestionOutOfRange { step, question });
        }
        self.state.session.set_answer(step, question, text);
        Ok(())
    }

    /// Current answer to `question` on the current step (`""` if unanswered).
    pub fn answer(&self, question: usize) -> &str {
        self.state
            .session
            .get_answer(self.state.cursor.index(), question)
    }

    /// Persist the full answer mapping.
    ///
    /// The answers are snapshotted when the call starts and sent whole, so a
    /// repeated save with no edits in between leaves the store unchanged. The
    /// first successful save adopts the store-assigned id; later saves update
    /// that same record. Failures are logged and returned; saving again is
    /// always safe.
    pub async fn save(&mut self) -> Result<SessionId, SessionError> {
        let id = self.state.session.id.clone();
        let snapshot = self.state.session.answers.clone();

        let saved_id = match self.store.create_or_update(id.as_ref(), &snapshot).await {
            Ok(saved_id) => saved_id,
            Err(e) => {
                tracing::warn!(session_id = ?id, error = %e, "save failed");
                return Err(e.into());
            }
        };

        if id.is_none() {
            tracing::info!(session_id = %saved_id, "session persisted for the first time");
        }
        self.state.session.adopt_id(saved_id.clone())?;
        tracing::debug!(session_id = %saved_id, answers = snapshot.len(), "session saved");

        Ok(saved_id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.state.session
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.state.session.id.as_ref()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.state.cursor
    }

    pub fn current_step(&self) -> &Step {
        // Cursor is clamped to the catalog it was built from.
        &self.catalog.steps()[self.state.cursor.index()]
    }

    pub fn current_questions(&self) -> &[Question] {
        &self.current_step().questions
    }

    pub fn progress(&self) -> Progress {
        Progress::evaluate(&self.catalog, &self.state.session.answers)
    }

    pub fn is_complete(&self) -> bool {
        progress::is_complete(&self.catalog, &self.state.session.answers)
    }

    pub fn title(&self) -> String {
        progress::display_title(&self.catalog, &self.state.session.answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingStore;
    use intake_types::catalog::Step;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::therapy_intake())
    }

    fn controller(store: &Arc<RecordingStore>) -> SessionController<Arc<RecordingStore>> {
        SessionController::new(store.clone(), catalog())
    }

    #[test]
    fn new_controller_is_draft_on_first_step() {
        let store = Arc::new(RecordingStore::new());
        let ctl = controller(&store);
        assert!(ctl.session().is_draft());
        assert_eq!(ctl.cursor().index(), 0);
        assert_eq!(ctl.current_step().name, "Basic Info");
    }

    #[test]
    fn navigation_is_clamped() {
        let store = Arc::new(RecordingStore::new());
        let mut ctl = controller(&store);
        assert_eq!(ctl.back(), 0);
        assert_eq!(ctl.next(), 1);
        assert_eq!(ctl.next(), 2);
        assert_eq!(ctl.next(), 2);
        assert_eq!(ctl.current_step().name, "Experience");
    }

    #[test]
    fn edit_addresses_current_step() {
        let store = Arc::new(RecordingStore::new());
        let mut ctl = controller(&store);
        ctl.next();
        ctl.edit_answer(0, "someone to listen").unwrap();

        assert_eq!(ctl.session().get_answer(1, 0), "someone to listen");
        assert_eq!(ctl.session().get_answer(0, 0), "");
        assert_eq!(ctl.answer(0), "someone to listen");
    }

    #[test]
    fn edit_out_of_range_is_rejected() {
        let store = Arc::new(RecordingStore::new());
        let mut ctl = controller(&store);
        ctl.next();
        let err = ctl.edit_answer(1, "nope").unwrap_err();
        assert_eq!(err, SessionError::QuestionOutOfRange { step: 1, question: 1 });
        assert!(ctl.session().answers.is_empty());
    }

    #[tokio::test]
    async fn end_to_end_first_save_then_update() {
        let store = Arc::new(RecordingStore::new());
        let mut ctl = controller(&store);

        ctl.edit_answer(0, "Alice").unwrap();
        ctl.edit_answer(1, "29").unwrap();
        let id = ctl.save().await.unwrap();

        assert_eq!(ctl.session_id(), Some(&id));
        assert_eq!(ctl.progress().percent, 50);
        assert_eq!(ctl.title(), "Alice (29)");

        ctl.next();
        ctl.edit_answer(0, "someone to talk to").unwrap();
        ctl.next();
        ctl.edit_answer(0, "no").unwrap();
        let second = ctl.save().await.unwrap();

        assert_eq!(second, id);
        assert_eq!(ctl.progress().percent, 100);
        assert!(ctl.is_complete());
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn repeated_save_is_idempotent() {
        let store = Arc::new(RecordingStore::new());
        let mut ctl = controller(&store);
        ctl.edit_answer(0, "Alice").unwrap();

        let id = ctl.save().await.unwrap();
        let once = store.fetch(&id).await.unwrap().answers;
        ctl.save().await.unwrap();
        let twice = store.fetch(&id).await.unwrap().answers;

        assert_eq!(once, twice);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn save_sends_full_mapping() {
        let store = Arc::new(RecordingStore::new());
        let mut ctl = controller(&store);
        ctl.edit_answer(0, "Alice").unwrap();
        ctl.save().await.unwrap();
        ctl.edit_answer(1, "29").unwrap();
        ctl.save().await.unwrap();

        let sent = store.saved_payloads();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].1.len(), 2, "second save must carry every answer, not a diff");
        assert!(sent[0].0.is_none());
        assert!(sent[1].0.is_some());
    }

    #[tokio::test]
    async fn failed_first_save_keeps_draft() {
        let store = Arc::new(RecordingStore::new());
        let mut ctl = controller(&store);
        ctl.edit_answer(0, "Alice").unwrap();

        store.fail_next_with_transport();
        let err = ctl.save().await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
        assert!(ctl.session().is_draft());
        assert_eq!(ctl.answer(0), "Alice");

        // manual retry succeeds and creates exactly one record
        ctl.save().await.unwrap();
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn load_replaces_state_and_resets_cursor() {
        let store = Arc::new(RecordingStore::new());
        let mut writer = controller(&store);
        writer.edit_answer(0, "Bob").unwrap();
        let id = writer.save().await.unwrap();

        let mut ctl = controller(&store);
        ctl.next();
        ctl.edit_answer(0, "unsaved draft text").unwrap();
        ctl.load(&id).await.unwrap();

        assert_eq!(ctl.cursor().index(), 0);
        assert_eq!(ctl.session_id(), Some(&id));
        assert_eq!(ctl.answer(0), "Bob");
        assert_eq!(ctl.session().get_answer(1, 0), "");
    }

    #[tokio::test]
    async fn load_unknown_id_falls_back_to_fresh_draft() {
        let store = Arc::new(RecordingStore::new());
        let mut ctl = controller(&store);
        ctl.edit_answer(0, "stale").unwrap();
        ctl.next();

        let err = ctl.load(&SessionId::from("missing")).await.unwrap_err();
        assert_eq!(err, SessionError::NotFound);
        assert!(ctl.session().is_draft());
        assert!(ctl.session().answers.is_empty());
        assert_eq!(ctl.cursor().index(), 0);
    }

    #[tokio::test]
    async fn load_transport_failure_falls_back_to_fresh_draft() {
        let store = Arc::new(RecordingStore::new());
        let mut ctl = controller(&store);
        store.fail_next_with_transport();

        let err = ctl.load(&SessionId::from("abc-123")).await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
        assert!(ctl.session().is_draft());
    }

    #[tokio::test]
    async fn works_with_custom_catalog() {
        let store = Arc::new(RecordingStore::new());
        let catalog = Arc::new(
            Catalog::new(
                "one",
                vec![Step::new("Only", vec![intake_types::catalog::Question::new("Why?")])],
            )
            .unwrap(),
        );
        let mut ctl = SessionController::new(store.clone(), catalog);
        assert_eq!(ctl.next(), 0);
        ctl.edit_answer(0, "because").unwrap();
        assert!(ctl.is_complete());
        assert_eq!(ctl.title(), progress::UNNAMED_TITLE);
    }
}
