//! Realtime gateway: applies inbound events to the store and produces the
//! replies for the originating connection.
//!
//! Replies are never sent to other connections. Failed events produce a
//! single `error` reply instead of being dropped.

use uuid::Uuid;

use crate::models::{QuizDraft, normalize_code, share_url};
use crate::protocol::{ClientMessage, ProgressSnapshot, ServerMessage};

use super::error::{GatewayError, Result};
use super::state::QuizStore;
use super::tracker::Progression;

/// Identity of one realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    /// Transport-level id, used for quiz groups.
    pub id: Uuid,
    /// Public id of the participant the connection acts for.
    pub participant_id: Uuid,
    /// Secret that lets a later connection act for the same participant.
    pub resume_token: Uuid,
    /// Whether the connection has joined any quiz yet.
    pub joined: bool,
}

impl Connection {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            participant_id: Uuid::new_v4(),
            resume_token: Uuid::new_v4(),
            joined: false,
        }
    }

    /// Greeting sent as soon as the connection is established.
    pub fn greeting(&self) -> ServerMessage {
        ServerMessage::Connected {
            participant_id: self.participant_id,
            resume_token: self.resume_token,
        }
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a raw text frame and handles it.
pub fn handle_text(store: &mut QuizStore, conn: &mut Connection, text: &str) -> Vec<ServerMessage> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => handle_client_message(store, conn, msg),
        Err(e) => {
            tracing::warn!("Malformed message from {}: {}", conn.participant_id, e);
            vec![GatewayError::Malformed(e.to_string()).into()]
        }
    }
}

/// Handles one inbound event.
pub fn handle_client_message(
    store: &mut QuizStore,
    conn: &mut Connection,
    msg: ClientMessage,
) -> Vec<ServerMessage> {
    tracing::debug!("Event from {}: {:?}", conn.participant_id, msg);

    let result = match msg {
        ClientMessage::CreateQuiz { title, questions } => {
            handle_create(store, conn, QuizDraft { title, questions })
        }
        ClientMessage::JoinQuiz {
            quiz_code,
            resume_token,
        } => handle_join(store, conn, &quiz_code, resume_token),
        ClientMessage::SubmitAnswer {
            quiz_code,
            question_index,
            answer_index,
        } => handle_answer(store, conn, &quiz_code, question_index, answer_index),
        ClientMessage::GetQuizResults { quiz_code } => handle_results(store, &quiz_code),
    };

    result.unwrap_or_else(|err| {
        tracing::warn!("Rejected event from {}: {}", conn.participant_id, err);
        vec![err.into()]
    })
}

fn handle_create(
    store: &mut QuizStore,
    conn: &Connection,
    draft: QuizDraft,
) -> Result<Vec<ServerMessage>> {
    let quiz = draft.into_definition().map_err(GatewayError::InvalidQuiz)?;
    let total = quiz.questions.len();
    let code = store
        .registry
        .create_quiz(quiz.title, quiz.questions, conn.participant_id);

    tracing::info!(
        "Quiz {} created by {} with {} questions",
        code,
        conn.participant_id,
        total
    );

    Ok(vec![ServerMessage::QuizCreated {
        share_url: share_url(&code),
        quiz_code: code,
    }])
}

fn handle_join(
    store: &mut QuizStore,
    conn: &mut Connection,
    quiz_code: &str,
    resume_token: Option<Uuid>,
) -> Result<Vec<ServerMessage>> {
    let code = normalize_code(quiz_code);
    let (participant_id, resume_token) = resolve_identity(store, conn, resume_token)?;
    {
        let quiz = store
            .registry
            .get_quiz(&code)
            .ok_or_else(|| GatewayError::QuizNotFound(code.clone()))?;
        if quiz.question(0).is_none() {
            return Err(GatewayError::InvalidIndex {
                index: 0,
                total: quiz.total_questions(),
            });
        }
    }

    // Validated above.
    conn.participant_id = participant_id;
    conn.resume_token = resume_token;
    conn.joined = true;
    store.remember_identity(resume_token, participant_id);
    store.join_group(&code, conn.id);

    let quiz = store
        .registry
        .get_quiz(&code)
        .ok_or_else(|| GatewayError::QuizNotFound(code.clone()))?;
    let first_question = quiz.question(0).ok_or(GatewayError::InvalidIndex {
        index: 0,
        total: quiz.total_questions(),
    })?;
    let record = store.tracker.start_tracking(&code, conn.participant_id);

    let current_question = if record.completed {
        None
    } else {
        quiz.question(record.current_question_index)
            .map(|q| q.view())
    };

    tracing::info!(
        "Participant {} joined quiz {} at question {}",
        conn.participant_id,
        code,
        record.current_question_index
    );

    Ok(vec![ServerMessage::QuizStarted {
        quiz_code: code.clone(),
        participant_id: conn.participant_id,
        title: quiz.title.clone(),
        total_questions: quiz.total_questions(),
        first_question: first_question.view(),
        current_question,
        progress: ProgressSnapshot::from(record),
    }])
}

/// Identity the connection acts for after presenting `resume_token`.
///
/// A connection that already joined a quiz keeps its identity.
fn resolve_identity(
    store: &QuizStore,
    conn: &Connection,
    resume_token: Option<Uuid>,
) -> Result<(Uuid, Uuid)> {
    let Some(token) = resume_token.filter(|t| *t != conn.resume_token) else {
        return Ok((conn.participant_id, conn.resume_token));
    };

    let participant_id = store
        .resolve_identity(token)
        .ok_or(GatewayError::UnknownResumeToken)?;
    if conn.joined && participant_id != conn.participant_id {
        return Err(GatewayError::IdentityConflict(conn.participant_id));
    }
    Ok((participant_id, token))
}

fn handle_answer(
    store: &mut QuizStore,
    conn: &Connection,
    quiz_code: &str,
    question_index: usize,
    answer_index: usize,
) -> Result<Vec<ServerMessage>> {
    let code = normalize_code(quiz_code);
    let policy = store.policy();
    let quiz = store
        .registry
        .get_quiz(&code)
        .ok_or_else(|| GatewayError::QuizNotFound(code.clone()))?;

    let outcome = store.tracker.record_answer(
        quiz,
        conn.participant_id,
        question_index,
        answer_index,
        policy,
    )?;

    let answered = quiz.question(question_index).ok_or(GatewayError::InvalidIndex {
        index: question_index,
        total: quiz.total_questions(),
    })?;

    let mut replies = Vec::with_capacity(2);
    match outcome.progression {
        Progression::Next { index } => {
            let next = quiz.question(index).ok_or(GatewayError::InvalidIndex {
                index,
                total: quiz.total_questions(),
            })?;
            replies.push(ServerMessage::NextQuestion {
                question: next.view(),
                question_number: index + 1,
                total_questions: quiz.total_questions(),
                score: outcome.score,
            });
        }
        Progression::Completed {
            score,
            total,
            percentage,
        } => {
            tracing::info!(
                "Participant {} finished quiz {} with score {}/{}",
                conn.participant_id,
                code,
                score,
                total
            );
            replies.push(ServerMessage::QuizCompleted {
                score,
                total_questions: total,
                percentage,
            });
        }
    }

    replies.push(ServerMessage::AnswerFeedback {
        is_correct: outcome.is_correct,
        correct_answer: answered.correct_answer,
        explanation: answered.explanation.clone(),
        your_answer: answer_index,
    });

    Ok(replies)
}

fn handle_results(store: &QuizStore, quiz_code: &str) -> Result<Vec<ServerMessage>> {
    let code = normalize_code(quiz_code);
    if !store.registry.contains(&code) {
        return Err(GatewayError::QuizNotFound(code));
    }

    let results = store
        .tracker
        .get_results(&code)
        .cloned()
        .unwrap_or_default();

    Ok(vec![ServerMessage::QuizResults {
        total_students: results.len(),
        online_students: store.group_size(&code),
        quiz_code: code,
        results,
    }])
}
