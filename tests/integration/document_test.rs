//! Integration tests for upload, listing, versions, and delete.

use chrono::Duration;
use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_second_upload_becomes_new_version() {
    let app = TestApp::new().await;

    let first = app.upload("report.pdf", b"first draft", &[]).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["message"], "File uploaded successfully");
    assert_eq!(first.body["fileName"], "report.pdf");

    app.clock.advance(Duration::seconds(5));

    let second = app.upload("report.pdf", b"second draft", &[]).await;
    assert_eq!(second.status, StatusCode::OK);
    let stored = second.body["fileName"].as_str().unwrap();
    assert!(stored.starts_with("report_v_"), "got {stored}");
    assert!(stored.ends_with(".pdf"));

    let listing = app.get("/api/documents").await;
    assert_eq!(listing.status, StatusCode::OK);
    let items = listing.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], stored);
    assert_eq!(items[0]["originalName"], "report.pdf");
    assert_eq!(items[0]["versionNumber"], 2);
    assert_eq!(items[0]["totalVersions"], 2);
    assert_eq!(items[0]["hasVersions"], true);
    assert_eq!(items[0]["type"], "application/pdf");

    let all = app.get("/api/documents?includeVersions=true").await;
    assert_eq!(all.body.as_array().unwrap().len(), 2);

    let versions = app.get("/api/documents/versions?baseName=report").await;
    assert_eq!(versions.status, StatusCode::OK);
    assert_eq!(versions.body["totalVersions"], 2);
    assert_eq!(versions.body["versions"][0]["fileName"], stored);
    assert_eq!(versions.body["versions"][0]["versionNumber"], 2);
    assert_eq!(versions.body["versions"][1]["fileName"], "report.pdf");
    assert_eq!(versions.body["versions"][1]["versionNumber"], 1);
}

#[tokio::test]
async fn test_explicit_new_version_uses_original_name() {
    let app = TestApp::new().await;
    app.seed("contract.pdf", b"v1").await;

    let response = app
        .upload(
            "contract-signed.pdf",
            b"v2",
            &[("isNewVersion", "true"), ("originalFileName", "contract.pdf")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let stored = response.body["fileName"].as_str().unwrap();
    assert!(stored.starts_with("contract_v_"), "got {stored}");
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let app = TestApp::new().await;
    let body = b"--docportal-test-boundary\r\nContent-Disposition: form-data; name=\"isNewVersion\"\r\n\r\ntrue\r\n--docportal-test-boundary--\r\n".to_vec();

    let response = app.multipart(body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "No file provided");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let mut config = crate::helpers::test_config();
    config.upload.max_upload_size_bytes = 16;
    let app = TestApp::with_config(config).await;

    let response = app.upload("big.pdf", &[b'x'; 64], &[]).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!app.documents().await.exists("big.pdf").await.unwrap());
}

#[tokio::test]
async fn test_versions_requires_base_name() {
    let app = TestApp::new().await;

    let response = app.get("/api/documents/versions").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Base name is required");
}

#[tokio::test]
async fn test_single_delete() {
    let app = TestApp::new().await;
    app.seed("memo.txt", b"hello").await;

    let response = app
        .request("DELETE", "/api/documents/delete?name=memo.txt", None, Some(&app.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Document \"memo.txt\" deleted successfully");

    let again = app
        .request("DELETE", "/api/documents/delete?name=memo.txt", None, Some(&app.token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_delete_partial_failure() {
    let app = TestApp::new().await;
    app.seed("a.pdf", b"a").await;

    let response = app
        .request(
            "DELETE",
            "/api/documents/delete",
            Some(json!({ "names": ["a.pdf", "b.pdf"] })),
            Some(&app.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::MULTI_STATUS);
    assert_eq!(response.body["message"], "Some documents could not be deleted");
    let results = response.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["name"], "a.pdf");
    assert_eq!(results[0]["deleted"], true);
    assert!(results[0].get("error").is_none());
    assert_eq!(results[1]["name"], "b.pdf");
    assert_eq!(results[1]["deleted"], false);
    assert!(results[1]["error"].is_string());

    assert!(!app.documents().await.exists("a.pdf").await.unwrap());
}

#[tokio::test]
async fn test_bulk_delete_all_succeed() {
    let app = TestApp::new().await;
    app.seed("a.pdf", b"a").await;
    app.seed("b.pdf", b"b").await;

    let response = app
        .request(
            "DELETE",
            "/api/documents/delete",
            Some(json!({ "names": ["a.pdf", "b.pdf"] })),
            Some(&app.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "All 2 documents deleted successfully");
}

#[tokio::test]
async fn test_delete_without_target_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request("DELETE", "/api/documents/delete", None, Some(&app.token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_debug_list_blobs() {
    let app = TestApp::new().await;
    app.seed("a.pdf", b"aaaa").await;
    app.seed("b.txt", b"bb").await;

    let response = app.get("/api/debug/list-blobs").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["containerExists"], true);
    assert_eq!(response.body["totalBlobsScanned"], 2);
    assert_eq!(response.body["blobs"][0]["name"], "a.pdf");
    assert_eq!(response.body["blobs"][0]["contentLength"], 4);
    assert_eq!(response.body["blobs"][0]["contentType"], "application/pdf");
}
