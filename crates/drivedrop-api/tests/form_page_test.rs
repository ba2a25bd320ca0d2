//! Form page, health and documentation endpoint tests.
//!
//! Run with: `cargo test -p drivedrop-api --test form_page_test`

mod helpers;

use helpers::{
    setup_test_app, NotifierMode, TestAppBuilder, TEST_CLIENT_ID, TEST_CLIENT_SECRET,
    TEST_EMAIL_PASS, TEST_REFRESH_TOKEN,
};

#[tokio::test]
async fn test_index_carries_only_public_client_id() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;

    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.contains(TEST_CLIENT_ID));
    assert!(html.contains("https://accounts.google.com/gsi/client"));
    assert!(!html.contains(TEST_CLIENT_SECRET));
    assert!(!html.contains(TEST_REFRESH_TOKEN));
    assert!(!html.contains(TEST_EMAIL_PASS));
}

#[tokio::test]
async fn test_assets_are_served_with_content_types() {
    let app = setup_test_app().await;

    let js = app.client().get("/app.js").await;
    assert_eq!(js.status_code(), 200);
    assert!(js
        .header("content-type")
        .to_str()
        .unwrap_or_default()
        .starts_with("text/javascript"));
    let script = js.text();
    assert!(script.contains("https://www.googleapis.com/auth/drive.file email profile"));
    assert!(script.contains("accessToken"));

    let css = app.client().get("/app.css").await;
    assert_eq!(css.status_code(), 200);
    assert!(css
        .header("content-type")
        .to_str()
        .unwrap_or_default()
        .starts_with("text/css"));
}

#[tokio::test]
async fn test_security_headers_allow_google_sign_in() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;

    let csp = response.header("content-security-policy");
    let csp = csp.to_str().unwrap_or_default();
    assert!(csp.contains("https://accounts.google.com/gsi/client"));
    assert_eq!(response.header("x-content-type-options"), "nosniff");
}

#[tokio::test]
async fn test_liveness() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_configured_stages() {
    let app = setup_test_app().await;

    let response = app.client().get("/ready").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage_fallback"], true);
    assert_eq!(body["email"], true);
}

#[tokio::test]
async fn test_readiness_fails_without_email_sender() {
    let app = TestAppBuilder::default()
        .notifier(NotifierMode::NotConfigured)
        .without_fallback_credential()
        .build()
        .await;

    let response = app.client().get("/ready").await;

    assert_eq!(response.status_code(), 503);
    let body: serde_json::Value = response.json();
    assert_eq!(body["storage_fallback"], false);
    assert_eq!(body["email"], false);
}

#[tokio::test]
async fn test_openapi_document_lists_upload() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/api/upload"]["post"].is_object());
}
