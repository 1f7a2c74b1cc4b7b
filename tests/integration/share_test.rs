//! Integration tests for download links, share links, signed blobs, and proxies.

use http::StatusCode;

use crate::helpers::{BASE_URL, TestApp, local_path};

#[tokio::test]
async fn test_download_link_serves_blob() {
    let app = TestApp::new().await;
    app.seed("notes.txt", b"plain text body").await;

    let response = app.get("/api/documents/download?name=notes.txt").await;
    assert_eq!(response.status, StatusCode::OK);
    let url = response.body["url"].as_str().unwrap();
    assert!(url.starts_with(&format!("{BASE_URL}/blobs/documents/notes.txt?token=")));

    let blob = app.request("GET", &local_path(url), None, None).await;
    assert_eq!(blob.status, StatusCode::OK);
    assert_eq!(blob.bytes.as_ref(), b"plain text body");
    assert_eq!(blob.headers["content-type"], "text/plain");
}

#[tokio::test]
async fn test_download_link_for_missing_blob() {
    let app = TestApp::new().await;

    let response = app.get("/api/documents/download?name=ghost.pdf").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_share_pdf_uses_viewer() {
    let app = TestApp::new().await;
    app.seed("guide.pdf", b"%PDF-1.7").await;

    let response = app
        .get("/api/documents/share?name=guide.pdf&expirationDays=3")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let share_url = response.body["shareUrl"].as_str().unwrap();
    assert!(
        share_url.starts_with(&format!("{BASE_URL}/shared/view?url=")),
        "got {share_url}"
    );
    assert!(share_url.ends_with("&name=guide.pdf"));
}

#[tokio::test]
async fn test_share_other_files_get_signed_link() {
    let app = TestApp::new().await;
    app.seed("photo.png", b"png").await;

    let response = app.get("/api/documents/share?name=photo.png").await;
    assert_eq!(response.status, StatusCode::OK);
    let share_url = response.body["shareUrl"].as_str().unwrap();

    let blob = app.request("GET", &local_path(share_url), None, None).await;
    assert_eq!(blob.status, StatusCode::OK);
    assert_eq!(
        blob.headers["content-disposition"],
        "inline; filename=\"photo.png\""
    );
}

#[tokio::test]
async fn test_share_rejects_out_of_range_lifetime() {
    let app = TestApp::new().await;
    app.seed("guide.pdf", b"%PDF-1.7").await;

    let response = app
        .get("/api/documents/share?name=guide.pdf&expirationDays=8")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_share_missing_blob() {
    let app = TestApp::new().await;

    let response = app.get("/api/documents/share?name=ghost.pdf").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blob_link_requires_valid_token() {
    let app = TestApp::new().await;
    app.seed("notes.txt", b"secret").await;

    let missing = app
        .request("GET", "/blobs/documents/notes.txt", None, None)
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let forged = app
        .request("GET", "/blobs/documents/notes.txt?token=abc.def.ghi", None, None)
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blob_link_is_bound_to_its_key() {
    let app = TestApp::new().await;
    app.seed("a.txt", b"a").await;
    app.seed("b.txt", b"b").await;

    let response = app.get("/api/documents/download?name=a.txt").await;
    let url = response.body["url"].as_str().unwrap();
    let swapped = local_path(url).replacen("/a.txt?", "/b.txt?", 1);

    let blob = app.request("GET", &swapped, None, None).await;
    assert_eq!(blob.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_proxy_requires_session_and_url() {
    let app = TestApp::new().await;

    let anonymous = app
        .request("GET", "/api/documents/proxy?url=https://example.com/a.pdf", None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let missing = app.get("/api/documents/proxy").await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], "URL is required");
}

#[tokio::test]
async fn test_public_proxy_only_relays_signed_links() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/api/documents/public-proxy?url=https%3A%2F%2Fexample.com%2Fa.pdf",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
