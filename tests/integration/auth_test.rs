//! Integration tests for session verification.

use axum::body::Body;
use chrono::Duration;
use http::{Request, StatusCode};

use docportal_auth::JwtEncoder;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_missing_session_is_rejected() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/documents", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_token_with_wrong_secret_is_rejected() {
    let app = TestApp::new().await;
    let mut other = app.config.auth.clone();
    other.jwt_secret = "someone-else".into();
    let forged = JwtEncoder::new(&other)
        .issue("mallory", None, Duration::hours(1))
        .unwrap();

    let response = app
        .request("GET", "/api/documents", None, Some(&forged))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new().await;
    let expired = JwtEncoder::new(&app.config.auth)
        .issue("tester", None, Duration::minutes(-10))
        .unwrap();

    let response = app
        .request("GET", "/api/documents", None, Some(&expired))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Session has expired");
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = TestApp::new().await;

    let req = Request::builder()
        .uri("/api/documents")
        .header(
            "Cookie",
            format!("{}={}", app.config.auth.session_cookie, app.token),
        )
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_array());
}

#[tokio::test]
async fn test_health_is_public_and_hardened() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["storage"]["documents"], true);
    assert_eq!(response.body["storage"]["url-shortener"], true);
    assert_eq!(
        response.headers["strict-transport-security"],
        "max-age=31536000; includeSubDomains"
    );
    assert_eq!(response.headers["x-frame-options"], "DENY");
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_debug_endpoint_hidden_unless_enabled() {
    let mut config = crate::helpers::test_config();
    config.server.debug_endpoints = false;
    let app = TestApp::with_config(config).await;

    let response = app.get("/api/debug/list-blobs").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
