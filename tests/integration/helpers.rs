//! Shared test helpers for integration tests.

use std::sync::OnceLock;

use axum::Router;
use axum::body::Body;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use calshare_api::AppState;
use calshare_api::router::build_router;
use calshare_auth::PasswordHasher;
use calshare_core::config::{AppConfig, SeedAccount, SeedConfig};
use calshare_core::types::ResourceId;
use calshare_store::MemoryBackend;

/// Password of every seeded account.
pub const PASSWORD: &str = "correct horse";

/// Share document inviting bob read-only.
pub const SHARE_BOB_READ: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<o:share xmlns:d="DAV:" xmlns:o="http://owncloud.org/ns">
  <o:set>
    <d:href>mailto:bob@example.com</d:href>
    <o:read/>
  </o:set>
</o:share>"#;

fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("Failed to hash password")
    })
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct backend access
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with alice, bob, and carol
    pub fn new() -> Self {
        let accounts = ["alice", "bob", "carol"]
            .iter()
            .map(|id| SeedAccount {
                id: id.to_string(),
                email: format!("{id}@example.com"),
                display_name: None,
                password_hash: password_hash().to_string(),
            })
            .collect();

        let config = AppConfig {
            seed: SeedConfig {
                accounts,
                ..SeedConfig::default()
            },
            ..AppConfig::default()
        };

        let backend =
            MemoryBackend::seeded(&config.dav, &config.seed).expect("Failed to seed backend");
        let state = AppState::new(config, backend).expect("Failed to build state");
        let router = build_router(state.clone());

        Self { router, state }
    }

    /// `Authorization` header value for a seeded user
    pub fn basic(user: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{user}:{PASSWORD}")))
    }

    /// Id of the seeded `personal` calendar of `user`
    pub fn personal_calendar(&self, user: &str) -> ResourceId {
        self.state
            .backend
            .store
            .find_calendar(&format!("principals/{user}"), "personal")
            .expect("Seeded calendar missing")
            .id
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let req = req
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body_bytes).into_owned(),
        }
    }

    /// POST a share document to a collection as a Basic-authenticated user
    pub async fn share(&self, user: &str, path: &str, document: &str) -> TestResponse {
        let auth = Self::basic(user);
        self.request(
            "POST",
            path,
            &[
                ("Authorization", auth.as_str()),
                ("Content-Type", "application/xml; charset=utf-8"),
            ],
            document,
        )
        .await
    }

    /// Login and return the session cookie pair and CSRF token
    pub async fn login(&self, user: &str) -> (String, String) {
        let auth = Self::basic(user);
        let response = self
            .request("POST", "/login", &[("Authorization", auth.as_str())], "")
            .await;

        assert_eq!(response.status, StatusCode::OK, "Login failed: {}", response.body);

        let cookie = response
            .headers
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .expect("No session cookie")
            .to_string();
        let token = response.json()["data"]["csrf_token"]
            .as_str()
            .expect("No csrf_token in login response")
            .to_string();

        (cookie, token)
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub body: String,
}

impl TestResponse {
    /// Body parsed as JSON, `Null` when it is not JSON
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}
