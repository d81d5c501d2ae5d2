use thiserror::Error;
use uuid::Uuid;

use crate::protocol::{ErrorKind, ServerMessage};

/// Reasons an inbound event could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("quiz {0} not found")]
    QuizNotFound(String),
    #[error("participant {participant} has not joined quiz {code}")]
    ParticipantNotFound { code: String, participant: Uuid },
    #[error("question {index} does not exist in a quiz of {total} questions")]
    InvalidIndex { index: usize, total: usize },
    #[error("expected an answer to question {expected}, got question {got}")]
    OutOfOrder { expected: usize, got: usize },
    #[error("quiz {0} is already completed")]
    AlreadyCompleted(String),
    #[error("resume token does not belong to any participant")]
    UnknownResumeToken,
    #[error("connection already acts for participant {0} and cannot switch identity")]
    IdentityConflict(Uuid),
    #[error("invalid quiz: {0}")]
    InvalidQuiz(String),
    #[error("malformed message: {0}")]
    Malformed(String),
}

pub type Result<T> = core::result::Result<T, GatewayError>;

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::QuizNotFound(_) => ErrorKind::QuizNotFound,
            Self::ParticipantNotFound { .. } => ErrorKind::ParticipantNotFound,
            Self::InvalidIndex { .. } => ErrorKind::InvalidIndex,
            Self::OutOfOrder { .. } => ErrorKind::OutOfOrder,
            Self::AlreadyCompleted(_) => ErrorKind::AlreadyCompleted,
            Self::UnknownResumeToken => ErrorKind::InvalidResumeToken,
            Self::IdentityConflict(_) => ErrorKind::IdentityConflict,
            Self::InvalidQuiz(_) => ErrorKind::InvalidQuiz,
            Self::Malformed(_) => ErrorKind::MalformedMessage,
        }
    }
}

impl From<GatewayError> for ServerMessage {
    fn from(err: GatewayError) -> Self {
        ServerMessage::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
