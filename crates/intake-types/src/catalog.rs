//! Question catalog: the static, ordered definition of steps and prompts.
//!
//! Answers are addressed positionally by `(step, question)`, so the order of
//! steps and questions is part of the persisted data format. Reordering a
//! catalog invalidates every stored session that was filled against it.
//!
//! Questions may carry a semantic [`QuestionRole`] so derived views (such as a
//! session's display title) look fields up by role instead of by position.

use serde::{Deserialize, Serialize};

use crate::answer::AnswerKey;
use crate::error::CatalogError;

/// Semantic tag attached to a question whose answer feeds a derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionRole {
    /// The respondent's name. Primary part of the display title.
    Name,
    /// The respondent's age. Appended to the title as `" (age)"`.
    Age,
}

/// A single prompt within a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<QuestionRole>,
}

impl Question {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: QuestionRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// A named page of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub questions: Vec<Question>,
}

impl Step {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }
}

/// Serialized shape of a catalog before validation.
#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default = "default_title")]
    title: String,
    steps: Vec<Step>,
}

fn default_title() -> String {
    "Questionnaire".to_string()
}

/// Immutable ordered list of steps shared by every session.
///
/// Construct with [`Catalog::new`] (validated) or deserialize from TOML/JSON.
/// The total question count is computed once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct Catalog {
    title: String,
    steps: Vec<Step>,
    #[serde(skip_serializing)]
    total_questions: usize,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Catalog::new(raw.title, raw.steps)
    }
}

impl Catalog {
    /// Build a catalog, rejecting empty steps and duplicated roles.
    pub fn new(title: impl Into<String>, steps: Vec<Step>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::NoSteps);
        }

        let mut seen_roles: Vec<QuestionRole> = Vec::new();
        for (index, step) in steps.iter().enumerate() {
            if step.questions.is_empty() {
                return Err(CatalogError::EmptyStep {
                    index,
                    name: step.name.clone(),
                });
            }
            for role in step.questions.iter().filter_map(|q| q.role) {
                if seen_roles.contains(&role) {
                    return Err(CatalogError::DuplicateRole(role));
                }
                seen_roles.push(role);
            }
        }

        let total_questions = steps.iter().map(|s| s.questions.len()).sum();

        Ok(Self {
            title: title.into(),
            steps,
            total_questions,
        })
    }

    /// The shipped therapy intake questionnaire.
    pub fn therapy_intake() -> Self {
        let steps = vec![
            Step::new(
                "Basic Info",
                vec![
                    Question::new("What is your name?").with_role(QuestionRole::Name),
                    Question::new("What is your age?").with_role(QuestionRole::Age),
                ],
            ),
            Step::new(
                "Preferences",
                vec![Question::new("What are you looking for in therapy?")],
            ),
            Step::new(
                "Experience",
                vec![Question::new("Have you seen a therapist before?")],
            ),
        ];

        Self {
            title: "Therapy Questionnaire".to_string(),
            total_questions: 4,
            steps,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Sum of question counts across all steps.
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// Whether `key` addresses a slot that exists in this catalog.
    pub fn contains(&self, key: &AnswerKey) -> bool {
        self.step(key.step)
            .is_some_and(|step| key.question < step.questions.len())
    }

    /// First question tagged with `role`, in catalog order.
    pub fn key_for_role(&self, role: QuestionRole) -> Option<AnswerKey> {
        self.steps.iter().enumerate().find_map(|(s, step)| {
            step.questions
                .iter()
                .position(|q| q.role == Some(role))
                .map(|q| AnswerKey::new(s, q))
        })
    }

    /// Every answer key in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = AnswerKey> + '_ {
        self.steps.iter().enumerate().flat_map(|(s, step)| {
            (0..step.questions.len()).map(move |q| AnswerKey::new(s, q))
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::therapy_intake()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn therapy_intake_shape() {
        let catalog = Catalog::therapy_intake();
        assert_eq!(catalog.step_count(), 3);
        assert_eq!(catalog.total_questions(), 4);
        assert_eq!(catalog.step(0).unwrap().name, "Basic Info");
        assert_eq!(catalog.step(2).unwrap().questions.len(), 1);
    }

    #[test]
    fn therapy_intake_matches_validated_build() {
        let shipped = Catalog::therapy_intake();
        let rebuilt = Catalog::new(shipped.title().to_string(), shipped.steps().to_vec()).unwrap();
        assert_eq!(shipped, rebuilt);
    }

    #[test]
    fn roles_resolve_to_positions() {
        let catalog = Catalog::therapy_intake();
        assert_eq!(catalog.key_for_role(QuestionRole::Name), Some(AnswerKey::new(0, 0)));
        assert_eq!(catalog.key_for_role(QuestionRole::Age), Some(AnswerKey::new(0, 1)));
    }

    #[test]
    fn contains_respects_bounds() {
        let catalog = Catalog::therapy_intake();
        assert!(catalog.contains(&AnswerKey::new(0, 1)));
        assert!(!catalog.contains(&AnswerKey::new(0, 2)));
        assert!(!catalog.contains(&AnswerKey::new(3, 0)));
    }

    #[test]
    fn keys_in_catalog_order() {
        let keys: Vec<String> = Catalog::therapy_intake()
            .keys()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, vec!["0-0", "0-1", "1-0", "2-0"]);
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(
            Catalog::new("empty", Vec::new()),
            Err(CatalogError::NoSteps)
        ));
    }

    #[test]
    fn rejects_step_without_questions() {
        let err = Catalog::new("bad", vec![Step::new("Blank", Vec::new())]).unwrap_err();
        assert!(err.to_string().contains("Blank"));
    }

    #[test]
    fn rejects_duplicate_roles() {
        let steps = vec![Step::new(
            "Who",
            vec![
                Question::new("Name?").with_role(QuestionRole::Name),
                Question::new("Also name?").with_role(QuestionRole::Name),
            ],
        )];
        assert!(matches!(
            Catalog::new("dup", steps),
            Err(CatalogError::DuplicateRole(QuestionRole::Name))
        ));
    }

    #[test]
    fn parses_from_toml() {
        let source = r#"
title = "Check-in"

[[steps]]
name = "About you"

[[steps.questions]]
prompt = "Name?"
role = "name"

[[steps.questions]]
prompt = "Mood?"
"#;
        let catalog: Catalog = toml::from_str(source).unwrap();
        assert_eq!(catalog.title(), "Check-in");
        assert_eq!(catalog.total_questions(), 2);
        assert_eq!(catalog.key_for_role(QuestionRole::Name), Some(AnswerKey::new(0, 0)));
        assert_eq!(catalog.key_for_role(QuestionRole::Age), None);
    }

    #[test]
    fn toml_validation_errors_surface() {
        let source = r#"
[[steps]]
name = "Nothing here"
questions = []
"#;
        assert!(toml::from_str::<Catalog>(source).is_err());
    }
}
