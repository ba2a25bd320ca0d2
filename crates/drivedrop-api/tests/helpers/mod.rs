//! Test helpers: build the router around recording storage and email doubles.
//!
//! Run from workspace root: `cargo test -p drivedrop-api`.

#![allow(dead_code)]

pub mod doubles;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use drivedrop_api::setup::routes;
use drivedrop_api::{AppState, UploadPipeline};
use drivedrop_core::Config;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub use doubles::{NotifierMode, RecordingNotifier, RecordingStorage, StorageMode};

pub const UPLOAD_PATH: &str = "/api/upload";

pub const TEST_CLIENT_ID: &str = "test-client.apps.googleusercontent.com";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret-value";
pub const TEST_REFRESH_TOKEN: &str = "test-refresh-token-value";
pub const TEST_EMAIL_PASS: &str = "test-smtp-password";

/// Test application: server plus the doubles it talks to.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<RecordingStorage>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub struct TestAppBuilder {
    storage_mode: StorageMode,
    notifier_mode: NotifierMode,
    with_fallback: bool,
    storage_timeout: Duration,
    email_timeout: Duration,
    http_transport: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::Succeed,
            notifier_mode: NotifierMode::Succeed,
            with_fallback: true,
            storage_timeout: Duration::from_secs(5),
            email_timeout: Duration::from_secs(5),
            http_transport: false,
        }
    }
}

impl TestAppBuilder {
    pub fn storage(mut self, mode: StorageMode) -> Self {
        self.storage_mode = mode;
        self
    }

    pub fn notifier(mut self, mode: NotifierMode) -> Self {
        self.notifier_mode = mode;
        self
    }

    pub fn without_fallback_credential(mut self) -> Self {
        self.with_fallback = false;
        self
    }

    pub fn storage_timeout(mut self, after: Duration) -> Self {
        self.storage_timeout = after;
        self
    }

    pub fn email_timeout(mut self, after: Duration) -> Self {
        self.email_timeout = after;
        self
    }

    /// Serve over a real listener so requests carry a `Content-Length`.
    pub fn http_transport(mut self) -> Self {
        self.http_transport = true;
        self
    }

    pub async fn build(self) -> TestApp {
        let config = test_config(self.with_fallback);
        let storage = Arc::new(RecordingStorage::new(self.storage_mode));
        let notifier = Arc::new(RecordingNotifier::new(self.notifier_mode));

        let pipeline = UploadPipeline::new(
            storage.clone(),
            notifier.clone(),
            config.storage.service_account(),
            self.storage_timeout,
            self.email_timeout,
        );
        let state = Arc::new(AppState::new(config.clone(), pipeline));
        let app = routes::setup_routes(&config, state)
            .await
            .expect("Failed to build routes");

        let server = if self.http_transport {
            TestServer::builder()
                .http_transport()
                .build(app.into_make_service())
        } else {
            TestServer::new(app.into_make_service())
        }
        .expect("Failed to create test server");

        TestApp {
            server,
            storage,
            notifier,
        }
    }
}

/// Default app: every stage succeeds and a fallback credential is configured.
pub async fn setup_test_app() -> TestApp {
    TestAppBuilder::default().build().await
}

pub fn test_config(with_fallback: bool) -> Config {
    let mut vars: HashMap<&str, &str> = HashMap::from([
        ("ENVIRONMENT", "test"),
        ("PUBLIC_GOOGLE_CLIENT_ID", TEST_CLIENT_ID),
        ("EMAIL_USER", "sender@example.com"),
        ("EMAIL_PASS", TEST_EMAIL_PASS),
        ("MAX_UPLOAD_SIZE_MB", "1"),
    ]);
    if with_fallback {
        vars.insert("GOOGLE_CLIENT_ID", TEST_CLIENT_ID);
        vars.insert("GOOGLE_CLIENT_SECRET", TEST_CLIENT_SECRET);
        vars.insert("GOOGLE_REFRESH_TOKEN", TEST_REFRESH_TOKEN);
    }
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).expect("test config")
}

/// Multipart form with the given parts; `None` leaves a part out.
pub fn upload_form(
    file: Option<(&str, &str, &[u8])>,
    email: Option<&str>,
    access_token: Option<&str>,
) -> MultipartForm {
    let mut form = MultipartForm::new();
    if let Some((name, mime, content)) = file {
        let part = Part::bytes(content.to_vec())
            .file_name(name.to_string())
            .mime_type(mime.to_string());
        form = form.add_part("file", part);
    }
    if let Some(email) = email {
        form = form.add_text("email", email.to_string());
    }
    if let Some(token) = access_token {
        form = form.add_text("accessToken", token.to_string());
    }
    form
}

pub fn report_pdf() -> (&'static str, &'static str, &'static [u8]) {
    ("report.pdf", "application/pdf", b"%PDF-1.4 quarterly report")
}
