//! Per-participant progress through a quiz.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One recorded answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerEntry {
    pub question_index: usize,
    pub answer_index: usize,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

/// Mutable progress of a single participant in a single quiz.
///
/// `score` always equals the number of correct entries in `answers`, and
/// `current_question_index` never decreases.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgressRecord {
    pub current_question_index: usize,
    pub score: usize,
    pub answers: Vec<AnswerEntry>,
    pub completed: bool,
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an answer and keeps the score in step with it.
    pub fn push_answer(&mut self, question_index: usize, answer_index: usize, is_correct: bool) {
        self.answers.push(AnswerEntry {
            question_index,
            answer_index,
            is_correct,
            timestamp: Utc::now(),
        });
        if is_correct {
            self.score += 1;
        }
    }

    /// Moves the cursor forward, or marks the quiz completed once the last
    /// question has been answered.
    pub fn advance_past(&mut self, question_index: usize, total_questions: usize) {
        let next = question_index + 1;
        if next < total_questions {
            self.current_question_index = self.current_question_index.max(next);
        } else {
            self.current_question_index = total_questions;
            self.completed = true;
        }
    }

    /// Score as a percentage of `total_questions`.
    pub fn percentage(&self, total_questions: usize) -> f64 {
        if total_questions == 0 {
            return 0.0;
        }
        (self.score as f64 / total_questions as f64) * 100.0
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }
}
