//! Tool facade served over HTTP: wire shape, session persistence
//! across calls, and AI generation with silent fallback.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use dogood::config::{ReasoningConfig, ToolServerConfig, WebhookConfig};
use dogood::reasoning::ReasoningClient;
use dogood::server::ToolServer;
use dogood::session::SessionStore;
use dogood::tools::notify::Notifier;
use dogood::tools::ToolFacade;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> ToolServerConfig {
    ToolServerConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
    }
}

async fn start(facade: ToolFacade) -> ToolServer {
    ToolServer::start(facade, &test_config()).await.unwrap()
}

async fn call(server: &ToolServer, name: &str, arguments: Value) -> Value {
    let url = format!("http://{}/mcp", server.addr());
    let body = json!({
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments },
    });
    let response = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let envelope: Value = response.json().await.unwrap();
    envelope["content"].clone()
}

#[tokio::test]
async fn completion_then_stats_round_trips_through_the_store() {
    let server = start(ToolFacade::new(SessionStore::new(), None, None)).await;

    let result = call(
        &server,
        "record_completion",
        json!({
            "activity_name": "Beach Cleanup",
            "duration_minutes": 60,
            "photo_verified": true,
            "user_id": "alex",
        }),
    )
    .await;
    assert_eq!(result["success"], true);
    assert_eq!(result["base_xp"], 30);
    assert_eq!(result["verification_bonus"], 20);
    assert_eq!(result["total_xp"], 50);

    let stats = call(&server, "get_stats", json!({"user_id": "alex"})).await;
    assert_eq!(stats["success"], true);
    assert_eq!(stats["total_xp"], 50);
    assert_eq!(stats["level"], 1);
    assert_eq!(stats["activities_completed"], 1);
}

#[tokio::test]
async fn stats_for_unknown_user_is_the_demo_snapshot() {
    let server = start(ToolFacade::new(SessionStore::new(), None, None)).await;
    let stats = call(&server, "get_stats", json!({"user_id": "stranger"})).await;
    assert_eq!(stats["total_xp"], 450);
    assert_eq!(stats["level"], 5);
    assert_eq!(stats["next_level_xp"], 500);
    assert_eq!(stats["badges"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn productivity_tasks_without_reasoning_are_static_and_sorted() {
    let server = start(ToolFacade::new(SessionStore::new(), None, None)).await;
    let result = call(
        &server,
        "get_productivity_tasks",
        json!({"use_ai": true, "max_tasks": 7}),
    )
    .await;

    assert_eq!(result["success"], true);
    assert_eq!(result["ai_generated"], false);

    let tasks = result["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 7);
    // Most-neglected first.
    assert_eq!(tasks[0]["title"], "Review Q4 Budget Report");
    assert_eq!(tasks[0]["lastDone"], "12 days ago");
    let work = tasks.iter().filter(|t| t["category"] == "Work").count();
    let personal = tasks.iter().filter(|t| t["category"] == "Personal").count();
    assert_eq!(work, 4);
    assert_eq!(personal, 3);
}

#[tokio::test]
async fn ai_generated_tasks_are_used_when_the_service_cooperates() {
    let reasoning_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "type": "text",
                "text": "```json\n{\"tasks\": [\
                    {\"id\": \"t1\", \"title\": \"Prep grant application\", \"lastDone\": \"9 days ago\", \"xp\": 85, \"category\": \"Work\", \"color\": \"#3B3766\"},\
                    {\"id\": \"t2\", \"title\": \"Sort donation box\", \"lastDone\": \"2 days ago\", \"xp\": 45, \"category\": \"Personal\", \"color\": \"#4A5A3C\"}\
                ]}\n```",
            }],
        })))
        .mount(&reasoning_mock)
        .await;

    let config = ReasoningConfig {
        api_url: reasoning_mock.uri(),
        timeout_secs: 5,
        ..ReasoningConfig::default()
    };
    let reasoning = ReasoningClient::with_key(&config, "k".to_owned()).unwrap();

    let store = SessionStore::new();
    // AI personalization only kicks in when the session has context.
    store.update("s1", |ctx| ctx.total_xp = 10).await;

    let server = start(ToolFacade::new(store, Some(reasoning), None)).await;
    // The client keys the call by session_id.
    let result = call(
        &server,
        "get_productivity_tasks",
        json!({"session_id": "s1", "use_ai": true, "max_tasks": 5}),
    )
    .await;

    assert_eq!(result["ai_generated"], true);
    let tasks = result["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "Prep grant application");
}

#[tokio::test]
async fn ai_failure_falls_back_to_static_tasks() {
    let reasoning_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&reasoning_mock)
        .await;

    let config = ReasoningConfig {
        api_url: reasoning_mock.uri(),
        timeout_secs: 5,
        ..ReasoningConfig::default()
    };
    let reasoning = ReasoningClient::with_key(&config, "k".to_owned()).unwrap();

    let store = SessionStore::new();
    store.update("alex", |ctx| ctx.total_xp = 10).await;

    let server = start(ToolFacade::new(store, Some(reasoning), None)).await;
    let result = call(
        &server,
        "get_productivity_tasks",
        json!({"user_id": "alex", "max_tasks": 3}),
    )
    .await;

    assert_eq!(result["success"], true);
    assert_eq!(result["ai_generated"], false);
    assert_eq!(result["tasks"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn self_improvement_defaults_have_dailies_and_weeklies() {
    let server = start(ToolFacade::new(SessionStore::new(), None, None)).await;
    let result = call(&server, "get_self_improvement_tasks", json!({})).await;

    assert_eq!(result["ai_generated"], false);
    assert_eq!(result["daily_tasks"].as_array().unwrap().len(), 4);
    assert_eq!(result["weekly_goals"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn schedule_reminder_posts_the_reminder_message() {
    let webhook_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inbound"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&webhook_mock)
        .await;

    let webhook = WebhookConfig {
        url: format!("{}/inbound", webhook_mock.uri()),
        timeout_secs: 5,
        ..WebhookConfig::default()
    };
    let notifier = Notifier::with_token(&webhook, "tok".to_owned()).unwrap();

    let server = start(ToolFacade::new(SessionStore::new(), None, Some(notifier))).await;
    let result = call(
        &server,
        "schedule_reminder",
        json!({"activity_name": "Beach Cleanup", "scheduled_time": "3pm"}),
    )
    .await;
    assert_eq!(result["success"], true);
    assert_eq!(result["reminder_created"], true);
    assert_eq!(result["notification_sent"], true);

    let requests = webhook_mock.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["message"],
        "Reminder: You have 'Beach Cleanup' scheduled for 3pm. Don't forget to DoGood!"
    );
}

#[tokio::test]
async fn reminder_survives_a_webhook_outage() {
    let webhook_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inbound"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&webhook_mock)
        .await;

    let webhook = WebhookConfig {
        url: format!("{}/inbound", webhook_mock.uri()),
        timeout_secs: 5,
        ..WebhookConfig::default()
    };
    let notifier = Notifier::with_token(&webhook, "tok".to_owned()).unwrap();

    let server = start(ToolFacade::new(SessionStore::new(), None, Some(notifier))).await;
    let result = call(
        &server,
        "schedule_reminder",
        json!({"activity_name": "Beach Cleanup", "scheduled_time": "3pm"}),
    )
    .await;

    // The reminder is still created; only the notification is lost.
    assert_eq!(result["success"], true);
    assert_eq!(result["reminder_created"], true);
    assert_eq!(result["notification_sent"], false);
}

#[tokio::test]
async fn suggestion_wire_shape_matches_the_client_contract() {
    let server = start(ToolFacade::new(SessionStore::new(), None, None)).await;
    let result = call(
        &server,
        "suggest_activities",
        json!({"interests": "education", "time_available": 30, "location": "Oakland"}),
    )
    .await;

    assert_eq!(result["success"], true);
    assert_eq!(result["category"], "education");
    assert_eq!(result["location"], "Oakland");
    assert_eq!(result["time_available"], 30);
    let suggested = result["suggested_activities"].as_array().unwrap();
    // Only Read to Kids fits a 30-minute budget.
    assert_eq!(suggested.len(), 1);
    assert_eq!(suggested[0]["name"], "Read to Kids");
    assert_eq!(suggested[0]["xp"], 40);
}
