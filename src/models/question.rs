use serde::{Deserialize, Serialize};

/// A single multiple-choice question as supplied by the quiz owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(alias = "question")]
    pub text: String,
    #[serde(alias = "options")]
    pub choices: Vec<String>,
    #[serde(alias = "correct_answer_index")]
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_answer
    }

    /// The student-facing part of the question, without the answer key.
    pub fn view(&self) -> QuestionView {
        QuestionView {
            text: self.text.clone(),
            choices: self.choices.clone(),
        }
    }
}

/// What a student gets to see of a question while answering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub text: String,
    pub choices: Vec<String>,
}
