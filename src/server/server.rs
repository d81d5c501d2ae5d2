//! HTTP and WebSocket server.

use std::fmt;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use futures_util::{SinkExt, Stream, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use crate::QuizError;
use crate::config::Config;
use crate::data::load_quiz_from_json;
use crate::protocol::ServerMessage;

use super::gateway::{self, Connection};
use super::pages;
use super::state::{QuizStore, SharedStore};

/// Participant id that owns quizzes preloaded from disk.
const HOST_PARTICIPANT: uuid::Uuid = uuid::Uuid::nil();

/// Run the quiz server until Ctrl-C.
pub async fn run(config: Config) -> Result<(), QuizError> {
    let mut store = QuizStore::new(config.answer_policy);
    preload(&mut store, &config)?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);
    tracing::info!("Answer policy: {:?}", config.answer_policy);

    axum::serve(listener, router(store.shared()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, store: SharedStore) -> std::io::Result<()> {
    axum::serve(listener, router(store)).await
}

/// All routes of the service.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(pages::teacher))
        .route("/student", get(pages::student))
        .route("/quiz/{code}", get(pages::take_quiz))
        .route("/ws", get(ws_handler))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}

fn preload(store: &mut QuizStore, config: &Config) -> Result<(), QuizError> {
    for path in &config.quiz_files {
        let quiz = load_quiz_from_json(path)?;
        let code = store
            .registry
            .create_quiz(quiz.title, quiz.questions, HOST_PARTICIPANT);
        tracing::info!(
            "Loaded quiz {} from {} (share url {})",
            code,
            path.display(),
            crate::models::share_url(&code)
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(store): State<SharedStore>) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, store))
}

/// Applies inbound frames until the peer goes away or replies can no longer
/// be delivered.
async fn read_frames<S, E>(
    mut incoming: S,
    store: &SharedStore,
    conn: &mut Connection,
    tx: &mpsc::UnboundedSender<ServerMessage>,
) where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    'frames: while let Some(msg) = incoming.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::debug!("Connection {} errored: {}", conn.id, e);
                break;
            }
            _ => continue,
        };

        if tx.is_closed() {
            tracing::debug!("Connection {} can no longer be written to", conn.id);
            break;
        }

        let replies = {
            let mut store = store.lock().await;
            gateway::handle_text(&mut store, conn, text.as_str())
        };

        for reply in replies {
            if tx.send(reply).is_err() {
                break 'frames;
            }
        }
    }
}

/// Handle a single WebSocket connection.
async fn handle_connection(socket: WebSocket, store: SharedStore) {
    let mut conn = Connection::new();
    tracing::info!(
        "Connection {} opened as participant {}",
        conn.id,
        conn.participant_id
    );

    let (mut ws_sender, ws_receiver) = socket.split();

    // Channel for replies to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let _ = tx.send(conn.greeting());

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to encode {:?}: {}", msg, e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    read_frames(ws_receiver, &store, &mut conn, &tx).await;

    // Progress records stay behind for a later reconnect
    store.lock().await.leave_all(conn.id);
    drop(tx);
    let _ = send_task.await;

    tracing::info!(
        "Connection {} closed (participant {})",
        conn.id,
        conn.participant_id
    );
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::path::PathBuf;

    use futures_util::stream;
    use serde_json::json;

    use super::*;

    fn create_frame() -> Message {
        let frame = json!({
            "event": "create_quiz",
            "questions": [{"text": "1 + 1?", "choices": ["1", "2"], "correct_answer": 1}]
        });
        Message::Text(frame.to_string().into())
    }

    #[tokio::test]
    async fn test_frames_are_applied_and_answered() {
        let store = QuizStore::default().shared();
        let mut conn = Connection::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let frames = stream::iter(vec![Ok::<_, Infallible>(create_frame())]);
        read_frames(frames, &store, &mut conn, &tx).await;

        assert_eq!(store.lock().await.registry.len(), 1);
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::QuizCreated { .. })));
    }

    #[tokio::test]
    async fn test_reading_stops_once_replies_cannot_be_sent() {
        let store = QuizStore::default().shared();
        let mut conn = Connection::new();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let frames = stream::iter(vec![
            Ok::<_, Infallible>(create_frame()),
            Ok(create_frame()),
        ]);
        read_frames(frames, &store, &mut conn, &tx).await;

        assert!(store.lock().await.registry.is_empty());
    }

    #[test]
    fn test_preload_registers_quiz_files() {
        let config = Config {
            quiz_files: vec![PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/capitals.json")],
            ..Config::default()
        };
        let mut store = QuizStore::default();

        preload(&mut store, &config).unwrap();
        assert_eq!(store.registry.len(), 1);
    }

    #[test]
    fn test_preload_fails_on_unreadable_file() {
        let config = Config {
            quiz_files: vec![std::env::temp_dir().join("live-quiz-no-such-quiz.json")],
            ..Config::default()
        };
        let mut store = QuizStore::default();

        let err = preload(&mut store, &config).unwrap_err();
        assert!(matches!(err, QuizError::Load(_)));
        assert!(store.registry.is_empty());
    }
}
