//! Gemini adapter and session generation against an in-process mock API.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use talkquote_core::error::GENERATION_FAILED;
use talkquote_core::{Category, Error, GeminiClient, NotificationKind, Quote, Session};

struct Captured {
    model_action: String,
    api_key: Option<String>,
    body: Value,
}

struct MockGemini {
    status: StatusCode,
    reply: Value,
    requests: Mutex<Vec<Captured>>,
}

async fn generate_content(
    State(mock): State<Arc<MockGemini>>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    mock.requests.lock().unwrap().push(Captured {
        model_action,
        api_key,
        body,
    });
    (mock.status, Json(mock.reply.clone()))
}

async fn spawn_gemini(status: StatusCode, reply: Value) -> (GeminiClient, Arc<MockGemini>) {
    let mock = Arc::new(MockGemini {
        status,
        reply,
        requests: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/v1beta/models/{model_action}", post(generate_content))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = GeminiClient::new("test-key", "gemini-2.5-flash", &format!("http://{addr}/"));
    (client, mock)
}

/// A generateContent reply whose first candidate carries `text`
fn candidate(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn returns_quote_from_schema_constrained_reply() {
    let (client, mock) = spawn_gemini(
        StatusCode::OK,
        candidate(r#"{"quote": "Programs must be written for people to read.", "author": "Harold Abelson"}"#),
    )
    .await;

    let quote = client.generate_quote(Category::Tech).await.unwrap();
    assert_eq!(quote, Quote::new("Programs must be written for people to read.", "Harold Abelson"));

    let requests = mock.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.model_action, "gemini-2.5-flash:generateContent");
    assert_eq!(request.api_key.as_deref(), Some("test-key"));
    assert_eq!(request.body["contents"][0]["parts"][0]["text"], Category::Tech.prompt());

    let config = &request.body["generationConfig"];
    assert_eq!(config["responseMimeType"], "application/json");
    assert_eq!(config["responseSchema"]["required"], json!(["quote", "author"]));
}

#[tokio::test]
async fn reply_missing_author_is_a_generation_error() {
    let (client, _mock) = spawn_gemini(StatusCode::OK, candidate(r#"{"quote": "Be yourself."}"#)).await;

    let err = client.generate_quote(Category::Funny).await.unwrap_err();
    assert!(matches!(err, Error::Generation { .. }));
    assert_eq!(err.to_string(), GENERATION_FAILED);
}

#[tokio::test]
async fn api_error_hides_detail_from_user() {
    let (client, _mock) = spawn_gemini(
        StatusCode::FORBIDDEN,
        json!({ "error": { "code": 403, "message": "API key not valid." } }),
    )
    .await;

    let err = client.generate_quote(Category::Zen).await.unwrap_err();
    assert_eq!(err.to_string(), GENERATION_FAILED);
    assert!(err.diagnostic().contains("API key not valid."));
}

#[tokio::test]
async fn empty_candidates_is_a_generation_error() {
    let (client, _mock) = spawn_gemini(StatusCode::OK, json!({ "candidates": [] })).await;

    let err = client.generate_quote(Category::Motivational).await.unwrap_err();
    assert!(matches!(err, Error::Generation { .. }));
}

#[tokio::test]
async fn session_generate_sets_current_quote() {
    let (client, mock) = spawn_gemini(
        StatusCode::OK,
        candidate(r#"{"quote": "Before enlightenment, chop wood, carry water.", "author": "Zen Proverb"}"#),
    )
    .await;
    let mut session = Session::new();
    session.set_category(Category::Zen);

    session.generate(&client).await;

    assert!(!session.is_generating());
    assert_eq!(
        session.current_quote(),
        Some(&Quote::new("Before enlightenment, chop wood, carry water.", "Zen Proverb"))
    );
    assert_eq!(session.notification().unwrap().kind, NotificationKind::Success);
    assert_eq!(
        mock.requests.lock().unwrap()[0].body["contents"][0]["parts"][0]["text"],
        Category::Zen.prompt()
    );
}
