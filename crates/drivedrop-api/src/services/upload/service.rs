//! Upload pipeline service
//!
//! Runs the stages after decode in strict order: validate → authorize → upload →
//! notify. Each stage depends on the previous one; the first failure aborts the
//! run. Nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use drivedrop_core::{AppError, Config, Credential, ServiceAccount, Stage, StoredObject};
use drivedrop_storage::{ObjectBody, ObjectMetadata, ObjectStorage};

use crate::constants::{EMAIL_FIELD, TOKEN_FIELD};
use crate::services::email::{NotificationEmail, Notifier};

use super::types::{DecodedForm, UploadOutcome, UploadRequest};

/// Stateless per request; shared by every handler invocation.
pub struct UploadPipeline {
    storage: Arc<dyn ObjectStorage>,
    notifier: Arc<dyn Notifier>,
    /// Fallback credential, or the reason it is unavailable.
    fallback: Result<ServiceAccount, String>,
    storage_timeout: Duration,
    email_timeout: Duration,
}

impl UploadPipeline {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        notifier: Arc<dyn Notifier>,
        fallback: Result<ServiceAccount, String>,
        storage_timeout: Duration,
        email_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            notifier,
            fallback,
            storage_timeout,
            email_timeout,
        }
    }

    pub fn from_config(
        config: &Config,
        storage: Arc<dyn ObjectStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(
            storage,
            notifier,
            config.storage.service_account(),
            config.storage.timeout,
            config.email.timeout,
        )
    }

    pub fn storage_fallback_configured(&self) -> bool {
        self.fallback.is_ok()
    }

    pub fn notifier_configured(&self) -> bool {
        self.notifier.is_configured()
    }

    pub fn storage_backend(&self) -> &'static str {
        self.storage.backend_name()
    }

    /// Run every stage after decode.
    pub async fn run(&self, form: DecodedForm) -> Result<UploadOutcome, AppError> {
        let mut request = validate(form)?;
        let credential = self.authorize(request.access_token.take())?;
        let stored = self.upload(&credential, &request).await?;
        self.notify(&request.email, stored).await
    }

    fn authorize(&self, access_token: Option<String>) -> Result<Credential, AppError> {
        let credential = Credential::resolve(access_token, self.fallback.as_ref().ok())
            .ok_or_else(|| AppError::Configuration {
                stage: Stage::Authorize,
                message: self
                    .fallback
                    .as_ref()
                    .err()
                    .cloned()
                    .unwrap_or_default(),
            })?;
        tracing::debug!(credential = credential.kind(), "Credential resolved");
        Ok(credential)
    }

    async fn upload(
        &self,
        credential: &Credential,
        request: &UploadRequest,
    ) -> Result<StoredObject, AppError> {
        let metadata = ObjectMetadata {
            name: request.file.object_name(),
            mime_type: request.file.mime_type(),
        };
        tracing::info!(
            file_name = %metadata.name,
            mime_type = %metadata.mime_type,
            size = request.file.size,
            credential = credential.kind(),
            backend = self.storage.backend_name(),
            "Uploading file to storage"
        );

        let body = ObjectBody::open(request.file.spool.path()).await?;
        let stored = with_timeout(
            Stage::Upload,
            self.storage_timeout,
            None,
            self.storage.create_object(credential, metadata, body),
        )
        .await?
        .map_err(AppError::from)?;

        tracing::info!(file_id = %stored.id, file_name = %stored.name, "File stored");
        Ok(stored)
    }

    async fn notify(&self, to: &str, stored: StoredObject) -> Result<UploadOutcome, AppError> {
        let email = NotificationEmail::upload_confirmation(to, &stored);
        let sent = with_timeout(
            Stage::Notify,
            self.email_timeout,
            Some(&stored),
            self.notifier.send(email),
        )
        .await?;

        if let Err(e) = sent {
            tracing::warn!(
                file_id = %stored.id,
                error = %e,
                "File stored but confirmation email failed"
            );
            return Err(e.into_app_error(Some(stored)));
        }

        Ok(UploadOutcome {
            stored,
            notified_to: to.to_string(),
        })
    }
}

/// Require a file and an email; the token is optional.
fn validate(mut form: DecodedForm) -> Result<UploadRequest, AppError> {
    let email = form.take_field(EMAIL_FIELD);
    let access_token = form.take_field(TOKEN_FIELD);

    let (file, email) = match (form.file.take(), email) {
        (Some(file), Some(email)) => (file, email.trim().to_string()),
        (file, email) => {
            tracing::debug!(
                has_file = file.is_some(),
                has_email = email.is_some(),
                "Rejecting upload with missing file or email"
            );
            return Err(AppError::MissingInput("Missing file or email".to_string()));
        }
    };

    email
        .parse::<lettre::Address>()
        .map_err(|e| AppError::InvalidInput(format!("Invalid email address: {}", e)))?;

    Ok(UploadRequest {
        file,
        email,
        access_token,
    })
}

/// Bound a remote call. On expiry the error names the stage and keeps any
/// object that was already stored.
async fn with_timeout<F: Future>(
    stage: Stage,
    after: Duration,
    stored: Option<&StoredObject>,
    call: F,
) -> Result<F::Output, AppError> {
    tokio::time::timeout(after, call).await.map_err(|_| {
        tracing::warn!(
            stage = %stage,
            after_secs = after.as_secs(),
            file_id = ?stored.map(|o| o.id.as_str()),
            "Remote call timed out"
        );
        AppError::Timeout {
            stage,
            after_secs: after.as_secs(),
            stored: stored.cloned(),
        }
    })
}
