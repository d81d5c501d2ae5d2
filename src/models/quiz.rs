//! Quiz definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Question;

/// Title used when the owner does not provide one.
pub const DEFAULT_TITLE: &str = "Classroom Quiz";

/// Length of a quiz code.
pub const CODE_LENGTH: usize = 6;

/// A quiz as submitted by its owner, before it has been validated and
/// assigned a code.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizDraft {
    #[serde(default)]
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

/// A draft that passed validation, ready to be registered.
#[derive(Debug, Clone)]
pub struct QuizDefinition {
    pub title: String,
    pub questions: Vec<Question>,
}

impl QuizDraft {
    /// Checks that every question can actually be answered and resolves the
    /// title.
    ///
    /// Returns a human readable reason on failure.
    pub fn into_definition(self) -> Result<QuizDefinition, String> {
        if self.questions.is_empty() {
            return Err("a quiz needs at least one question".to_string());
        }

        for (i, question) in self.questions.iter().enumerate() {
            if question.choices.is_empty() {
                return Err(format!("question {} has no choices", i + 1));
            }
            if question.correct_answer >= question.choices.len() {
                return Err(format!(
                    "question {} marks choice {} as correct but only has {} choices",
                    i + 1,
                    question.correct_answer,
                    question.choices.len()
                ));
            }
        }

        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string();

        Ok(QuizDefinition {
            title,
            questions: self.questions,
        })
    }
}

/// An immutable quiz held by the registry.
#[derive(Debug, Clone, Serialize)]
pub struct Quiz {
    pub code: String,
    pub title: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    /// Participant that created the quiz.
    pub owner: Uuid,
}

impl Quiz {
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Path of the student page for this quiz.
    pub fn share_url(&self) -> String {
        share_url(&self.code)
    }
}

pub fn share_url(code: &str) -> String {
    format!("/quiz/{}", code)
}

/// Normalizes a code typed in by a student.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Whether `code` has the shape of a generated quiz code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(choices: usize, correct: usize) -> Question {
        Question {
            text: "2 + 2?".to_string(),
            choices: (0..choices).map(|i| i.to_string()).collect(),
            correct_answer: correct,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_validate_defaults_title() {
        let draft = QuizDraft {
            title: Some("   ".to_string()),
            questions: vec![question(4, 2)],
        };
        assert_eq!(draft.into_definition().unwrap().title, DEFAULT_TITLE);

        let draft = QuizDraft {
            title: Some(" Algebra ".to_string()),
            questions: vec![question(4, 2)],
        };
        assert_eq!(draft.into_definition().unwrap().title, "Algebra");
    }

    #[test]
    fn test_validate_rejects_unanswerable_quizzes() {
        let empty = QuizDraft {
            title: None,
            questions: vec![],
        };
        assert!(empty.into_definition().is_err());

        let no_choices = QuizDraft {
            title: None,
            questions: vec![question(0, 0)],
        };
        assert!(no_choices.into_definition().is_err());

        let bad_key = QuizDraft {
            title: None,
            questions: vec![question(4, 1), question(3, 3)],
        };
        let reason = bad_key.into_definition().unwrap_err();
        assert!(reason.contains("question 2"));
    }

    #[test]
    fn test_code_shape() {
        assert!(is_valid_code("AB12CD"));
        assert!(!is_valid_code("ab12cd"));
        assert!(!is_valid_code("AB12C"));
        assert!(!is_valid_code("AB-2CD"));
        assert_eq!(normalize_code(" ab12cd\n"), "AB12CD");
    }

    #[test]
    fn test_question_aliases() {
        let json = r#"{"question":"Capital of France?","options":["Paris","Rome"],"correct_answer":0}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.text, "Capital of France?");
        assert_eq!(q.choices.len(), 2);
        assert!(q.is_correct(0));
        assert!(q.explanation.is_empty());
    }
}
