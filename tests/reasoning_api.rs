//! Wire-level contract tests for the reasoning client and the
//! notification webhook, against a mock HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use dogood::config::{ReasoningConfig, WebhookConfig};
use dogood::reasoning::ReasoningClient;
use dogood::tools::notify::Notifier;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn reasoning_config(uri: &str) -> ReasoningConfig {
    ReasoningConfig {
        api_url: uri.to_owned(),
        model: "test-model".to_owned(),
        max_tokens: 512,
        timeout_secs: 5,
        ..ReasoningConfig::default()
    }
}

fn messages_body(text: &str) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "model": "test-model",
    })
}

#[tokio::test]
async fn complete_sends_expected_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 512,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body("hello back")))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        ReasoningClient::with_key(&reasoning_config(&server.uri()), "sk-test".to_owned()).unwrap();
    let text = client.complete("hello").await.unwrap();
    assert_eq!(text, "hello back");
}

#[tokio::test]
async fn complete_wraps_prompt_as_single_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body("ok")))
        .mount(&server)
        .await;

    let client =
        ReasoningClient::with_key(&reasoning_config(&server.uri()), "k".to_owned()).unwrap();
    client.complete("what can I do today?").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "what can I do today?");
}

#[tokio::test]
async fn complete_surfaces_non_2xx_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client =
        ReasoningClient::with_key(&reasoning_config(&server.uri()), "k".to_owned()).unwrap();
    let err = client.complete("hi").await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("429"), "{message}");
    assert!(message.contains("rate limited"), "{message}");
}

#[tokio::test]
async fn complete_rejects_response_without_text_block() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "content": [{ "type": "tool_use" }] })),
        )
        .mount(&server)
        .await;

    let client =
        ReasoningClient::with_key(&reasoning_config(&server.uri()), "k".to_owned()).unwrap();
    assert!(client.complete("hi").await.is_err());
}

fn webhook_config(uri: &str) -> WebhookConfig {
    WebhookConfig {
        url: format!("{uri}/inbound"),
        timeout_secs: 5,
        ..WebhookConfig::default()
    }
}

#[tokio::test]
async fn notifier_posts_bearer_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inbound"))
        .and(header("Authorization", "Bearer tok-1"))
        .and(body_partial_json(json!({ "message": "You earned 40 XP!" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Notifier::with_token(&webhook_config(&server.uri()), "tok-1".to_owned()).unwrap();
    notifier.send("You earned 40 XP!").await.unwrap();
}

#[tokio::test]
async fn notifier_does_not_retry_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inbound"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Notifier::with_token(&webhook_config(&server.uri()), "tok".to_owned()).unwrap();
    assert!(notifier.send("hello").await.is_err());

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}
