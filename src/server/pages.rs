//! Page routes. Each page is a small shell; all quiz interaction happens
//! over the realtime channel at `/ws`.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::models::{is_valid_code, normalize_code};

pub async fn teacher() -> Html<String> {
    Html(shell("Teacher dashboard", "teacher", None))
}

pub async fn student() -> Html<String> {
    Html(shell("Join a quiz", "student", None))
}

pub async fn take_quiz(Path(code): Path<String>) -> Response {
    let code = normalize_code(&code);
    if !is_valid_code(&code) {
        return (StatusCode::NOT_FOUND, "No such quiz code").into_response();
    }
    Html(shell(&format!("Quiz {}", code), "quiz", Some(code.as_str()))).into_response()
}

// Codes are validated to [A-Z0-9] before they reach the markup.
fn shell(title: &str, view: &str, code: Option<&str>) -> String {
    let code_attr = code
        .map(|c| format!(" data-quiz-code=\"{}\"", c))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body data-view="{view}" data-socket="/ws"{code_attr}>
<h1>{title}</h1>
<main id="app"></main>
</body>
</html>
"#
    )
}
