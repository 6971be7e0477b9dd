//! Wiremock-backed tests for the Ollama client

use rf_ollama::OllamaClient;
use rf_types::{AppError, ChatClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn chat_returns_message_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "tinyllama",
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "role": "assistant",
                "content": "/\\d{4}/g"
            },
            "done": true
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let content = client.chat("tinyllama", "four digits").await.unwrap();
    assert_eq!(content, "/\\d{4}/g");
}

#[tokio::test]
async fn chat_sends_system_and_user_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("regex pattern generator"))
        .and(body_string_contains("a prompt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "/a/g" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    client.chat("tinyllama", "a prompt").await.unwrap();
}

#[tokio::test]
async fn chat_maps_http_error_to_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let err = client.chat("tinyllama", "anything").await.unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn chat_rejects_missing_message_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "done": true })))
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let err = client.chat("tinyllama", "anything").await.unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));
}

#[tokio::test]
async fn chat_maps_connection_failure_to_upstream() {
    // Port 1 is never listening
    let client = OllamaClient::with_base_url("http://127.0.0.1:1".to_string());
    let err = client.chat("tinyllama", "anything").await.unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));
}

#[tokio::test]
async fn status_reports_running_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "0.5.4" })))
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let status = client.status().await;
    assert!(status.is_running);
    assert_eq!(status.version.as_deref(), Some("0.5.4"));
    assert!(status.error.is_none());
}

#[tokio::test]
async fn status_reports_unreachable_server() {
    let client = OllamaClient::with_base_url("http://127.0.0.1:1".to_string());
    let status = client.status().await;
    assert!(!status.is_running);
    assert!(status.error.is_some());
}
