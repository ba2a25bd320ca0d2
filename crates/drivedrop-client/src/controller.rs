//! Upload form state machine.
//!
//! Mirrors the browser page: sign in to obtain a bearer token, pick a file,
//! enter an email address, submit once. The token lives only in memory.

use async_trait::async_trait;

use crate::{ClientError, SelectedFile, Submission, SubmitReply, Submitter};

/// Consent scope requested from Google.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file email profile";

const SIGNED_IN: &str = "Signed in to Google Drive!";
const SIGN_IN_FAILED: &str = "Google sign-in failed.";
const MISSING_FIELDS: &str = "Please select a file and enter an email.";
const MISSING_TOKEN: &str = "Please sign in with Google Drive first.";
const UPLOAD_FAILED: &str = "Upload failed.";

/// Interactive consent flow that yields a short-lived bearer token.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, scope: &str) -> Result<String, ClientError>;
}

/// Authorizer that hands back a token obtained elsewhere.
#[derive(Clone)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }
}

#[async_trait]
impl Authorizer for StaticToken {
    async fn authorize(&self, _scope: &str) -> Result<String, ClientError> {
        self.0
            .clone()
            .ok_or_else(|| ClientError::Authorization("no access token provided".to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

pub struct FormController<A, S> {
    authorizer: A,
    submitter: S,
    file: Option<SelectedFile>,
    email: String,
    access_token: Option<String>,
    status: SubmitStatus,
    message: String,
}

impl<A: Authorizer, S: Submitter> FormController<A, S> {
    pub fn new(authorizer: A, submitter: S) -> Self {
        Self {
            authorizer,
            submitter,
            file: None,
            email: String::new(),
            access_token: None,
            status: SubmitStatus::Idle,
            message: String::new(),
        }
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    /// Last user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_authorized(&self) -> bool {
        self.access_token.is_some()
    }

    /// Run the consent flow and keep the token on success.
    pub async fn authorize(&mut self) -> bool {
        match self.authorizer.authorize(DRIVE_SCOPE).await {
            Ok(token) if !token.is_empty() => {
                self.access_token = Some(token);
                self.message = SIGNED_IN.to_string();
                true
            }
            Ok(_) => {
                self.message = SIGN_IN_FAILED.to_string();
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "Authorization failed");
                self.message = SIGN_IN_FAILED.to_string();
                false
            }
        }
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some()
            && !self.email.is_empty()
            && self.access_token.is_some()
            && self.status != SubmitStatus::InFlight
    }

    /// Send file, email and token as one request.
    ///
    /// Success clears the file and email; failure keeps them for a retry.
    pub async fn submit(&mut self) -> &SubmitStatus {
        if self.status == SubmitStatus::InFlight {
            return &self.status;
        }
        let file = match (&self.file, self.email.is_empty()) {
            (Some(file), false) => file.clone(),
            _ => {
                self.message = MISSING_FIELDS.to_string();
                return &self.status;
            }
        };
        let Some(access_token) = self.access_token.clone() else {
            self.message = MISSING_TOKEN.to_string();
            return &self.status;
        };

        let submission = Submission {
            file,
            email: self.email.clone(),
            access_token,
        };

        self.status = SubmitStatus::InFlight;
        self.message.clear();

        let reply = self.submitter.submit(&submission).await;
        match reply {
            Ok(SubmitReply::Accepted(_)) => {
                self.message = format!(
                    "Upload complete! You will be notified at {}",
                    submission.email
                );
                self.file = None;
                self.email.clear();
                self.status = SubmitStatus::Succeeded;
            }
            Ok(SubmitReply::Rejected { status, error }) => {
                tracing::debug!(status, error = ?error, "Upload rejected");
                self.message = error.unwrap_or_else(|| UPLOAD_FAILED.to_string());
                self.status = SubmitStatus::Failed;
            }
            Err(e) => {
                self.message = format!("Upload failed: {}", e);
                self.status = SubmitStatus::Failed;
            }
        }
        &self.status
    }
}
