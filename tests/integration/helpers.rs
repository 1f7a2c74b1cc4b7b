//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use chrono::{Duration, Utc};
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use docportal_api::state::{AppState, link_base_url};
use docportal_auth::JwtEncoder;
use docportal_core::config::AppConfig;
use docportal_core::traits::clock::{Clock, ManualClock};
use docportal_core::traits::storage::StorageProvider;
use docportal_storage::StorageManager;

pub const BASE_URL: &str = "http://localhost:8080";
const BOUNDARY: &str = "docportal-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Clock shared by storage and services
    pub clock: Arc<ManualClock>,
    /// Containers behind the router
    pub storage: Arc<StorageManager>,
    /// Application config
    pub config: AppConfig,
    /// Valid session token
    pub token: String,
}

/// Captured response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Bytes,
    pub body: Value,
}

/// Configuration used by every test app.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.public_base_url = BASE_URL.to_string();
    config.server.debug_endpoints = true;
    config.storage.provider = "memory".to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.storage.signing_secret = "integration-link-secret".to_string();
    config
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test application from a custom configuration
    pub async fn with_config(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let shared_clock: Arc<dyn Clock> = clock.clone();

        let storage = Arc::new(
            StorageManager::in_memory(&config.storage, &link_base_url(&config), shared_clock.clone())
                .await,
        );

        let state = AppState::build(config.clone(), storage.clone(), shared_clock)
            .await
            .expect("Failed to build app state");
        let router = docportal_api::build_app(state);

        let token = JwtEncoder::new(&config.auth)
            .issue("tester", Some("Test User"), Duration::hours(1))
            .expect("Failed to issue token");

        Self {
            router,
            clock,
            storage,
            config,
            token,
        }
    }

    /// Document container
    pub async fn documents(&self) -> Arc<dyn StorageProvider> {
        self.storage.documents().await.expect("documents container")
    }

    /// Short URL container
    pub async fn short_urls(&self) -> Arc<dyn StorageProvider> {
        self.storage.short_urls().await.expect("short url container")
    }

    /// Store a blob directly, bypassing the API
    pub async fn seed(&self, name: &str, data: &'static [u8]) {
        self.documents()
            .await
            .write(name, Bytes::from_static(data), None)
            .await
            .expect("Failed to seed blob");
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Authenticated GET
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, Some(&self.token)).await
    }

    /// Upload `data` as `file_name` with extra text fields
    pub async fn upload(
        &self,
        file_name: &str,
        data: &[u8],
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        self.multipart(body).await
    }

    /// Send a raw multipart body to the upload endpoint
    pub async fn multipart(&self, body: Vec<u8>) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri("/api/documents/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {}", self.token))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}

/// Path and query of an absolute URL issued by the app
pub fn local_path(url: &str) -> String {
    url.strip_prefix(BASE_URL)
        .expect("URL should be rooted at the test base URL")
        .to_string()
}
