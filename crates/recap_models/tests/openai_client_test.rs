//! Drives the HTTP driver against a local stub endpoint.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use recap_core::CompletionRequest;
use recap_error::CompletionErrorKind;
use recap_interface::CompletionDriver;
use recap_models::{OpenAiCompatClient, OpenAiConfig};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct Stub {
    status: u16,
    retry_after: Option<&'static str>,
    body: String,
    delay: Option<Duration>,
    seen: Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>,
}

impl Stub {
    fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
            delay: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn handler(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response<Body> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.seen.lock().push((auth, body));

    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = Response::builder()
        .status(StatusCode::from_u16(stub.status).unwrap())
        .header("content-type", "application/json");
    if let Some(retry_after) = stub.retry_after {
        response = response.header("retry-after", retry_after);
    }
    response.body(Body::from(stub.body.clone())).unwrap()
}

async fn serve(stub: Stub) -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(handler))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn request() -> CompletionRequest {
    CompletionRequest::builder()
        .prompt("Summarize: Alice and Bob agreed to ship on Friday.")
        .system_prompt(Some("Be concise.".to_string()))
        .model("test-model")
        .build()
        .unwrap()
}

fn client(base_url: String) -> OpenAiCompatClient {
    OpenAiCompatClient::new(
        OpenAiConfig::new(base_url, "test-model")
            .with_api_key("sk-test")
            .with_timeout(Duration::from_millis(500)),
    )
    .unwrap()
}

const OK_BODY: &str = r#"{
    "id": "chatcmpl-1",
    "object": "chat.completion",
    "model": "test-model-2024",
    "choices": [{"index": 0, "message": {"role": "assistant", "content": "Ship on Friday."}, "finish_reason": "stop"}]
}"#;

#[tokio::test]
async fn test_successful_completion() {
    let stub = Stub::new(200, OK_BODY);
    let seen = stub.seen.clone();
    let driver = client(serve(stub).await);

    let response = driver.complete(&request()).await.unwrap();
    assert_eq!(response.text, "Ship on Friday.");
    assert_eq!(response.model, "test-model-2024");

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.as_deref(), Some("Bearer sk-test"));
    let body = &seen[0].1;
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["stream"], false);
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let mut stub = Stub::new(429, r#"{"error":{"message":"Rate limit reached"}}"#);
    stub.retry_after = Some("7");
    let driver = client(serve(stub).await);

    let err = driver.complete(&request()).await.unwrap_err();
    match err.kind {
        CompletionErrorKind::RateLimited {
            retry_after,
            message,
        } => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)));
            assert!(message.contains("Rate limit reached"));
        }
        other => panic!("unexpected kind: {:?}", other),
    }
}

#[tokio::test]
async fn test_status_codes_are_classified() {
    let cases = [
        (401, "invalid_credential"),
        (403, "forbidden"),
        (500, "server_error"),
        (504, "timeout"),
        (422, "unclassified"),
    ];

    for (status, label) in cases {
        let driver = client(serve(Stub::new(status, "{}")).await);
        let err = driver.complete(&request()).await.unwrap_err();
        assert_eq!(err.kind.label(), label, "status {}", status);
    }
}

#[tokio::test]
async fn test_empty_completion_is_unclassified() {
    let body = r#"{"choices":[{"message":{"role":"assistant","content":"   "}}]}"#;
    let driver = client(serve(Stub::new(200, body)).await);

    let err = driver.complete(&request()).await.unwrap_err();
    assert!(matches!(err.kind, CompletionErrorKind::Unclassified(_)));
}

#[tokio::test]
async fn test_undecodable_body_is_unclassified() {
    let driver = client(serve(Stub::new(200, "<html>gateway</html>")).await);

    let err = driver.complete(&request()).await.unwrap_err();
    assert!(matches!(err.kind, CompletionErrorKind::Unclassified(_)));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let mut stub = Stub::new(200, OK_BODY);
    stub.delay = Some(Duration::from_secs(5));
    let driver = client(serve(stub).await);

    let err = driver.complete(&request()).await.unwrap_err();
    assert!(matches!(err.kind, CompletionErrorKind::Timeout(_)), "{:?}", err.kind);
}

#[tokio::test]
async fn test_refused_connection_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let driver = client(format!("http://{}", addr));
    let err = driver.complete(&request()).await.unwrap_err();
    assert!(matches!(err.kind, CompletionErrorKind::Network(_)), "{:?}", err.kind);
}
