//! HTTP client and form controller for the drivedrop upload endpoint.
//!
//! `ApiClient` packages a file, an email address and an optional bearer token
//! into the multipart request the server expects. `FormController` drives the
//! sign-in → select → submit flow on top of it; the CLI uses both directly.

pub mod controller;

use anyhow::{Context, Result};
use async_trait::async_trait;
use drivedrop_core::UploadResponse;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio_util::io::ReaderStream;

pub use controller::{Authorizer, FormController, StaticToken, SubmitStatus, DRIVE_SCOPE};

const UPLOAD_PATH: &str = "/api/upload";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("{0}")]
    Transport(String),

    #[error("Could not read {path}: {reason}")]
    File { path: String, reason: String },

    #[error("Invalid MIME type: {0}")]
    InvalidMimeType(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Authorization(String),
}

/// File chosen by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Declared MIME type, if known. The server falls back to
    /// `application/octet-stream`.
    pub mime_type: Option<String>,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }
}

/// Everything packaged into one upload request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub file: SelectedFile,
    pub email: String,
    pub access_token: String,
}

/// Server answer to a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitReply {
    Accepted(UploadResponse),
    /// Non-success status; `error` is the server's `error` field when present.
    Rejected { status: u16, error: Option<String> },
}

/// Sends a submission to the server.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<SubmitReply, ClientError>;
}

/// HTTP client for the upload endpoint.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: DRIVEDROP_URL (default http://localhost:3000).
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("DRIVEDROP_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn build_form(&self, submission: &Submission) -> Result<Form, ClientError> {
        let path = &submission.file.path;
        let file_error = |e: std::io::Error| ClientError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let file = tokio::fs::File::open(path).await.map_err(file_error)?;
        let len = file.metadata().await.map_err(file_error)?.len();

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let mut part = Part::stream_with_length(body, len);
        if let Some(name) = submission.file.file_name() {
            part = part.file_name(name);
        }
        if let Some(mime) = &submission.file.mime_type {
            part = part
                .mime_str(mime)
                .map_err(|e| ClientError::InvalidMimeType(e.to_string()))?;
        }

        Ok(Form::new()
            .part("file", part)
            .text("email", submission.email.clone())
            .text("accessToken", submission.access_token.clone()))
    }
}

#[async_trait]
impl Submitter for ApiClient {
    async fn submit(&self, submission: &Submission) -> Result<SubmitReply, ClientError> {
        let form = self.build_form(submission).await?;
        let url = self.build_url(UPLOAD_PATH);
        tracing::debug!(url = %url, "Submitting upload");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: UploadResponse = response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            return Ok(SubmitReply::Accepted(body));
        }

        let error = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .filter(|e| !e.is_empty());

        Ok(SubmitReply::Rejected {
            status: status.as_u16(),
            error,
        })
    }
}
