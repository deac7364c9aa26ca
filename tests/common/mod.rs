#![allow(dead_code)]

use agent_relay::app_state::build_app_state;
use agent_relay::build_router;
use agent_relay::config::RelayConfig;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_ID: &str = "1052939";
pub const CONFIGURED_INSTALLATION: u64 = 42;
pub const INSTALLATION_TOKEN: &str = "ghs_test_token";
pub const MODEL: &str = "qwen2.5:latest";

pub fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

pub fn private_key_path() -> String {
    fixture_path("app-key.pem")
}

pub fn public_key_pem() -> Vec<u8> {
    std::fs::read(fixture_path("app-key.pub.pem")).expect("public key fixture")
}

/// Configuration pointing both collaborators at local mock servers.
pub fn test_config(github_url: &str, ollama_url: &str) -> RelayConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("GITHUB_APP_ID", APP_ID.to_string()),
        ("PRIVATE_KEY_PATH", private_key_path()),
        ("INSTALLATION_ID", CONFIGURED_INSTALLATION.to_string()),
        ("OLLAMA_URL", ollama_url.to_string()),
        ("OLLAMA_MODEL", MODEL.to_string()),
        ("GITHUB_API_URL", github_url.to_string()),
        ("BIND_ADDR", "127.0.0.1:0".to_string()),
    ]);
    RelayConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

pub fn test_app(config: RelayConfig) -> Router {
    build_router(Arc::new(build_app_state(config).expect("app state")))
}

pub async fn mount_token_exchange(server: &MockServer, installation_id: u64) {
    Mock::given(method("POST"))
        .and(path(format!(
            "/app/installations/{}/access_tokens",
            installation_id
        )))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "token": INSTALLATION_TOKEN })),
        )
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_generation(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": MODEL,
            "response": text,
            "done": true
        })))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn webhook_request(event: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("X-GitHub-Event", event)
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

pub fn comment_payload(body: &str) -> Value {
    json!({
        "action": "created",
        "issue": { "number": 5, "title": "Flaky build", "body": "It fails sometimes" },
        "comment": { "body": body, "user": { "login": "octocat" } },
        "repository": { "full_name": "octo/widgets" }
    })
}

pub fn issue_payload(title: &str, body: Option<&str>, installation_id: Option<u64>) -> Value {
    let mut payload = json!({
        "action": "opened",
        "issue": { "number": 12, "title": title, "body": body },
        "repository": { "full_name": "octo/widgets" }
    });
    if let Some(id) = installation_id {
        payload["installation"] = json!({ "id": id });
    }
    payload
}
