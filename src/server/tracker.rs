//! Progress tracker: (quiz code, participant) to progress record.

use std::collections::{BTreeMap, HashMap};

use clap::ValueEnum;
use uuid::Uuid;

use crate::models::{ProgressRecord, Quiz};

use super::error::{GatewayError, Result};

/// How answers that do not target the participant's current question are
/// treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AnswerPolicy {
    /// Only the current question may be answered.
    #[default]
    Sequential,
    /// Any existing question may be answered, any number of times.
    Lenient,
}

/// What happens after an answer has been recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Progression {
    Next { index: usize },
    Completed { score: usize, total: usize, percentage: f64 },
}

/// Result of a recorded answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub score: usize,
    pub progression: Progression,
}

/// Progress of every participant in every quiz. Records are never removed.
#[derive(Default)]
pub struct ProgressTracker {
    progress: HashMap<String, BTreeMap<Uuid, ProgressRecord>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh record unless the participant already has one.
    ///
    /// Returns the (possibly pre-existing) record.
    pub fn start_tracking(&mut self, code: &str, participant: Uuid) -> &ProgressRecord {
        self.progress
            .entry(code.to_string())
            .or_default()
            .entry(participant)
            .or_default()
    }

    pub fn get(&self, code: &str, participant: Uuid) -> Option<&ProgressRecord> {
        self.progress.get(code)?.get(&participant)
    }

    /// Records an answer to `question_index` and advances the participant.
    pub fn record_answer(
        &mut self,
        quiz: &Quiz,
        participant: Uuid,
        question_index: usize,
        answer_index: usize,
        policy: AnswerPolicy,
    ) -> Result<AnswerOutcome> {
        let record = self
            .progress
            .get_mut(&quiz.code)
            .and_then(|records| records.get_mut(&participant))
            .ok_or_else(|| GatewayError::ParticipantNotFound {
                code: quiz.code.clone(),
                participant,
            })?;

        if record.completed {
            return Err(GatewayError::AlreadyCompleted(quiz.code.clone()));
        }

        let total = quiz.total_questions();
        let question = quiz
            .question(question_index)
            .ok_or(GatewayError::InvalidIndex {
                index: question_index,
                total,
            })?;

        if policy == AnswerPolicy::Sequential && question_index != record.current_question_index {
            return Err(GatewayError::OutOfOrder {
                expected: record.current_question_index,
                got: question_index,
            });
        }

        let is_correct = question.is_correct(answer_index);
        record.push_answer(question_index, answer_index, is_correct);
        record.advance_past(question_index, total);

        let progression = if record.completed {
            Progression::Completed {
                score: record.score,
                total,
                percentage: record.percentage(total),
            }
        } else {
            Progression::Next {
                index: question_index + 1,
            }
        };

        Ok(AnswerOutcome {
            is_correct,
            score: record.score,
            progression,
        })
    }

    /// Every participant's record for a quiz, or `None` if nobody ever joined.
    pub fn get_results(&self, code: &str) -> Option<&BTreeMap<Uuid, ProgressRecord>> {
        self.progress.get(code)
    }
}
