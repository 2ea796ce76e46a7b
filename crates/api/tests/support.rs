//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use goca_api::{router, AppContext};
use goca_domain::{Config, EventType, ProviderCredential, ProviderKind, ProviderSettings};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

pub const GOOGLE_TOKEN: &str = r#"{"access_token":"ya29.test","token_type":"Bearer"}"#;

/// Router over a temp-file database with both providers pointed at a
/// wiremock server.
pub struct TestApp {
    pub context: Arc<AppContext>,
    pub server: MockServer,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let server = MockServer::start().await;

        let mut config = Config::default();
        config.database.path = temp_dir.path().join("goca-api.db").display().to_string();
        config.providers.google = ProviderSettings::google().with_base_url(server.uri());
        config.providers.microsoft = ProviderSettings::microsoft().with_base_url(server.uri());

        let context = AppContext::new(config).expect("context should initialize");
        Self { context: Arc::new(context), server, _temp_dir: temp_dir }
    }

    pub fn router(&self) -> Router {
        router(Arc::clone(&self.context))
    }

    /// Seed host `alice` with an "Intro Call" (30 minutes, UTC).
    pub async fn seed_alice(&self, credentials: Vec<ProviderCredential>) -> EventType {
        let hosts = &self.context.hosts;
        let host_id = hosts
            .create_host("alice", Some("Alice"), Some("alice@host.example"))
            .await
            .expect("host inserted");
        for credential in credentials {
            hosts.save_credential(host_id, credential).await.expect("credential saved");
        }
        hosts.add_event_type(host_id, "Intro Call", 30, "UTC").await.expect("event type added")
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).expect("request");
        send(self.router(), request).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("request");
        send(self.router(), request).await
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

pub fn google_credential() -> ProviderCredential {
    ProviderCredential::new(ProviderKind::Google, GOOGLE_TOKEN)
}

/// Booking form for Bob Lee at 2024-05-01 10:00.
pub fn booking_form(event_type_id: i64, location: &str) -> Value {
    json!({
        "username": "alice",
        "name": "Bob Lee",
        "email": "bob@x.com",
        "event_type_id": event_type_id,
        "date": "2024-05-01",
        "time": "10:00",
        "meeting_location": location,
        "notes": "see you",
    })
}
