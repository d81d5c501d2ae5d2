//! Protocol messages for the realtime channel.
//!
//! All messages are JSON text frames over WebSocket, tagged by an `event`
//! field carrying the snake_case event name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ProgressRecord, Question, QuestionView};

/// Events sent from a browser to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Owner creates a new quiz.
    CreateQuiz {
        #[serde(default)]
        title: Option<String>,
        questions: Vec<Question>,
    },

    /// Student joins a quiz, optionally resuming the identity behind an
    /// earlier `resume_token`.
    JoinQuiz {
        quiz_code: String,
        #[serde(default)]
        resume_token: Option<Uuid>,
    },

    /// Student answers a question.
    SubmitAnswer {
        quiz_code: String,
        question_index: usize,
        answer_index: usize,
    },

    /// Anyone asks for the progress of every participant.
    GetQuizResults { quiz_code: String },
}

/// Events sent from the server to the originating connection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection accepted. `participant_id` is public and shows up in
    /// results; `resume_token` is only ever sent to this connection.
    Connected {
        participant_id: Uuid,
        resume_token: Uuid,
    },

    QuizCreated { quiz_code: String, share_url: String },

    QuizStarted {
        quiz_code: String,
        participant_id: Uuid,
        title: String,
        total_questions: usize,
        first_question: QuestionView,
        /// Question to continue with, absent once the quiz is completed.
        current_question: Option<QuestionView>,
        progress: ProgressSnapshot,
    },

    NextQuestion {
        question: QuestionView,
        question_number: usize,
        total_questions: usize,
        score: usize,
    },

    QuizCompleted {
        score: usize,
        total_questions: usize,
        percentage: f64,
    },

    AnswerFeedback {
        is_correct: bool,
        correct_answer: usize,
        explanation: String,
        your_answer: usize,
    },

    QuizResults {
        quiz_code: String,
        results: BTreeMap<Uuid, ProgressRecord>,
        total_students: usize,
        online_students: usize,
    },

    Error { kind: ErrorKind, message: String },
}

/// Where a participant stands when (re)joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub current_question_index: usize,
    pub score: usize,
    pub completed: bool,
}

impl From<&ProgressRecord> for ProgressSnapshot {
    fn from(record: &ProgressRecord) -> Self {
        Self {
            current_question_index: record.current_question_index,
            score: record.score,
            completed: record.completed,
        }
    }
}

/// Machine readable category of an `error` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    QuizNotFound,
    ParticipantNotFound,
    InvalidIndex,
    OutOfOrder,
    AlreadyCompleted,
    InvalidResumeToken,
    IdentityConflict,
    InvalidQuiz,
    MalformedMessage,
}

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;
