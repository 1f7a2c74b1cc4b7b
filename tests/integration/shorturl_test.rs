//! Integration tests for the URL shortener.

use axum::body::Body;
use chrono::Duration;
use http::{Request, StatusCode};
use serde_json::json;

use crate::helpers::TestApp;

async fn create(app: &TestApp, host: &str, body: serde_json::Value) -> crate::helpers::TestResponse {
    let req = Request::builder()
        .method("POST")
        .uri("/api/shorturl/create")
        .header("Host", host)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", app.token))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.send(req).await
}

#[tokio::test]
async fn test_create_resolve_and_expire() {
    let app = TestApp::new().await;

    let created = create(
        &app,
        "localhost:3000",
        json!({ "url": "https://example.com/some/long/path", "expirationDays": 7 }),
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["originalUrl"], "https://example.com/some/long/path");
    let short_url = created.body["shortUrl"].as_str().unwrap();
    let code = short_url
        .strip_prefix("http://localhost:3000/s/")
        .expect("local hosts use http");
    assert_eq!(code.len(), 7);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

    let resolved = app
        .request("GET", &format!("/api/shorturl/{code}"), None, None)
        .await;
    assert_eq!(resolved.status, StatusCode::OK);
    assert_eq!(resolved.body["url"], "https://example.com/some/long/path");

    let redirect = app.request("GET", &format!("/s/{code}"), None, None).await;
    assert_eq!(redirect.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        redirect.headers["location"],
        "https://example.com/some/long/path"
    );

    app.clock.advance(Duration::days(8));

    let expired = app
        .request("GET", &format!("/api/shorturl/{code}"), None, None)
        .await;
    assert_eq!(expired.status, StatusCode::NOT_FOUND);
    assert_eq!(expired.body["message"], "URL not found or expired");
    assert!(!app.short_urls().await.exists(code).await.unwrap());

    let again = app
        .request("GET", &format!("/api/shorturl/{code}"), None, None)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_hosts_get_https() {
    let app = TestApp::new().await;

    let created = create(&app, "docs.example.com", json!({ "url": "https://example.com/" })).await;

    assert_eq!(created.status, StatusCode::OK);
    assert!(
        created.body["shortUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://docs.example.com/s/")
    );
}

#[tokio::test]
async fn test_create_requires_url() {
    let app = TestApp::new().await;

    let response = create(&app, "localhost:3000", json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "URL is required");
}

#[tokio::test]
async fn test_create_requires_session() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/shorturl/create",
            Some(json!({ "url": "https://example.com/" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/shorturl/Zz9Zz9Z", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let redirect = app.request("GET", "/s/Zz9Zz9Z", None, None).await;
    assert_eq!(redirect.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_expiration_is_rejected() {
    let app = TestApp::new().await;

    let response = create(
        &app,
        "localhost:3000",
        json!({ "url": "https://example.com/", "expirationDays": 4294967295u64 }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}
