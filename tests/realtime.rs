use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use live_quiz::server::{QuizStore, serve};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, QuizStore::default().shared()));
    addr
}

/// Identity handed out in the `connected` greeting.
struct Identity {
    participant_id: String,
    resume_token: String,
}

/// Connects and consumes the `connected` greeting.
async fn connect(addr: SocketAddr) -> (Socket, Identity) {
    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    let greeting = recv(&mut ws).await;
    assert_eq!(greeting["event"], "connected");
    let identity = Identity {
        participant_id: greeting["participant_id"].as_str().unwrap().to_string(),
        resume_token: greeting["resume_token"].as_str().unwrap().to_string(),
    };
    assert_ne!(identity.participant_id, identity.resume_token);
    (ws, identity)
}

async fn send(ws: &mut Socket, value: Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

async fn recv(ws: &mut Socket) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for the server")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

fn two_questions() -> Value {
    json!({
        "event": "create_quiz",
        "title": "Capitals",
        "questions": [
            {"text": "Capital of France?", "choices": ["Paris", "Lyon"], "correct_answer": 0, "explanation": "Paris since 508"},
            {"text": "Capital of Italy?", "choices": ["Milan", "Rome"], "correct_answer": 1, "explanation": "Rome since 1871"}
        ]
    })
}

#[tokio::test]
async fn test_full_quiz_over_websocket() {
    let addr = start_server().await;

    let (mut teacher, _) = connect(addr).await;
    send(&mut teacher, two_questions()).await;
    let created = recv(&mut teacher).await;
    assert_eq!(created["event"], "quiz_created");
    let code = created["quiz_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    assert_eq!(created["share_url"], format!("/quiz/{}", code));

    let (mut student, identity) = connect(addr).await;
    let participant_id = identity.participant_id;
    send(&mut student, json!({"event": "join_quiz", "quiz_code": code})).await;
    let started = recv(&mut student).await;
    assert_eq!(started["event"], "quiz_started");
    assert_eq!(started["title"], "Capitals");
    assert_eq!(started["total_questions"], 2);
    assert_eq!(started["first_question"]["text"], "Capital of France?");
    assert!(started["first_question"].get("correct_answer").is_none());

    send(
        &mut student,
        json!({"event": "submit_answer", "quiz_code": code, "question_index": 0, "answer_index": 0}),
    )
    .await;
    let next = recv(&mut student).await;
    assert_eq!(next["event"], "next_question");
    assert_eq!(next["question_number"], 2);
    assert_eq!(next["score"], 1);
    let feedback = recv(&mut student).await;
    assert_eq!(feedback["event"], "answer_feedback");
    assert_eq!(feedback["is_correct"], true);
    assert_eq!(feedback["explanation"], "Paris since 508");

    send(
        &mut student,
        json!({"event": "submit_answer", "quiz_code": code, "question_index": 1, "answer_index": 0}),
    )
    .await;
    let completed = recv(&mut student).await;
    assert_eq!(completed["event"], "quiz_completed");
    assert_eq!(completed["score"], 1);
    assert_eq!(completed["total_questions"], 2);
    assert_eq!(completed["percentage"], 50.0);
    let feedback = recv(&mut student).await;
    assert_eq!(feedback["is_correct"], false);
    assert_eq!(feedback["correct_answer"], 1);
    assert_eq!(feedback["your_answer"], 0);

    send(&mut teacher, json!({"event": "get_quiz_results", "quiz_code": code})).await;
    let results = recv(&mut teacher).await;
    assert_eq!(results["event"], "quiz_results");
    assert_eq!(results["total_students"], 1);
    assert_eq!(results["online_students"], 1);
    let record = &results["results"][participant_id.as_str()];
    assert_eq!(record["score"], 1);
    assert_eq!(record["completed"], true);
    assert_eq!(record["answers"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_code_gets_an_error_not_a_start() {
    let addr = start_server().await;
    let (mut student, _) = connect(addr).await;

    send(&mut student, json!({"event": "join_quiz", "quiz_code": "NOSUCH"})).await;
    let reply = recv(&mut student).await;
    assert_eq!(reply["event"], "error");
    assert_eq!(reply["kind"], "quiz_not_found");

    send(&mut student, json!({"event": "join_quiz"})).await;
    let reply = recv(&mut student).await;
    assert_eq!(reply["kind"], "malformed_message");
}

#[tokio::test]
async fn test_reconnect_resumes_progress() {
    let addr = start_server().await;

    let (mut teacher, _) = connect(addr).await;
    send(&mut teacher, two_questions()).await;
    let code = recv(&mut teacher).await["quiz_code"]
        .as_str()
        .unwrap()
        .to_string();

    let (mut student, identity) = connect(addr).await;
    send(&mut student, json!({"event": "join_quiz", "quiz_code": code})).await;
    recv(&mut student).await;
    send(
        &mut student,
        json!({"event": "submit_answer", "quiz_code": code, "question_index": 0, "answer_index": 1}),
    )
    .await;
    recv(&mut student).await;
    recv(&mut student).await;
    student.close(None).await.unwrap();

    let (mut impostor, _) = connect(addr).await;
    send(
        &mut impostor,
        json!({"event": "join_quiz", "quiz_code": code, "resume_token": identity.participant_id}),
    )
    .await;
    let rejected = recv(&mut impostor).await;
    assert_eq!(rejected["event"], "error");
    assert_eq!(rejected["kind"], "invalid_resume_token");

    let (mut again, fresh) = connect(addr).await;
    assert_ne!(fresh.participant_id, identity.participant_id);
    send(
        &mut again,
        json!({"event": "join_quiz", "quiz_code": code, "resume_token": identity.resume_token}),
    )
    .await;
    let started = recv(&mut again).await;
    assert_eq!(started["event"], "quiz_started");
    assert_eq!(started["participant_id"], identity.participant_id.as_str());
    assert_eq!(started["progress"]["current_question_index"], 1);
    assert_eq!(started["progress"]["score"], 0);
    assert_eq!(started["current_question"]["text"], "Capital of Italy?");
}
