//! Progress, completion and title derivation.
//!
//! Pure functions over a [`Catalog`] and a session's [`Answers`]. Nothing here
//! is persisted; every view is recomputed on demand.

use serde::Serialize;

use intake_types::answer::{is_answered, Answers};
use intake_types::catalog::{Catalog, QuestionRole};

/// Title shown for sessions whose name field is blank.
pub const UNNAMED_TITLE: &str = "Unnamed";

/// Snapshot of a session's completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    /// Rounded percentage in `0..=100`.
    pub percent: u8,
    pub complete: bool,
}

impl Progress {
    pub fn evaluate(catalog: &Catalog, answers: &Answers) -> Self {
        let answered = answered_count(catalog, answers);
        let total = catalog.total_questions();
        Self {
            answered,
            total,
            percent: percent_of(answered, total),
            complete: answered == total,
        }
    }
}

/// Number of catalog slots holding non-whitespace text.
///
/// Keys outside the catalog (left over from an older catalog shape) are
/// ignored so the count never exceeds the total.
pub fn answered_count(catalog: &Catalog, answers: &Answers) -> usize {
    answers
        .iter()
        .filter(|(key, text)| catalog.contains(key) && is_answered(text))
        .count()
}

/// `round(100 * answered / total)`, or 0 when the catalog has no questions.
pub fn progress_percent(catalog: &Catalog, answers: &Answers) -> u8 {
    percent_of(answered_count(catalog, answers), catalog.total_questions())
}

pub fn is_complete(catalog: &Catalog, answers: &Answers) -> bool {
    answered_count(catalog, answers) == catalog.total_questions()
}

/// Integer round-half-up of `100 * answered / total`.
fn percent_of(answered: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let answered = answered.min(total);
    ((200 * answered + total) / (2 * total)) as u8
}

/// Human-readable label for a session.
///
/// Reads the questions tagged [`QuestionRole::Name`] and [`QuestionRole::Age`]:
/// `"Alice (29)"`, `"Alice"` when the age is blank, and [`UNNAMED_TITLE`] when
/// the name is blank or the catalog has no name question.
pub fn display_title(catalog: &Catalog, answers: &Answers) -> String {
    let name = role_answer(catalog, answers, QuestionRole::Name);
    if name.is_empty() {
        return UNNAMED_TITLE.to_string();
    }

    match role_answer(catalog, answers, QuestionRole::Age) {
        "" => name.to_string(),
        age => format!("{name} ({age})"),
    }
}

/// Trimmed answer to the question tagged `role`, or `""`.
fn role_answer<'a>(catalog: &Catalog, answers: &'a Answers, role: QuestionRole) -> &'a str {
    catalog
        .key_for_role(role)
        .map(|key| answers.get(&key).trim())
        .unwrap_or("")
}
