//! Email service for sending upload confirmations via SMTP.

use async_trait::async_trait;
use drivedrop_core::{AppError, EmailConfig, StoredObject};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

pub const CONFIRMATION_SUBJECT: &str = "File Uploaded to Google Drive";

/// One outgoing plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl NotificationEmail {
    pub fn upload_confirmation(to: &str, object: &StoredObject) -> Self {
        Self {
            to: to.to_string(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            body: format!(
                "The file \"{}\" has been uploaded to Google Drive.",
                object.name
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Email sender is not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Email could not be built: {0}")]
    Build(String),

    #[error("Email relay rejected the message: {0}")]
    Rejected(String),
}

impl NotifyError {
    /// Convert into the pipeline error, keeping the object that is already stored.
    pub fn into_app_error(self, stored: Option<StoredObject>) -> AppError {
        AppError::Notification {
            message: self.to_string(),
            stored,
        }
    }
}

/// Sends transactional email.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: NotificationEmail) -> Result<(), NotifyError>;

    /// Whether a sender is configured at all (readiness reporting only).
    fn is_configured(&self) -> bool;
}

/// SMTP notifier authenticated as the configured sender.
///
/// Built at startup even when the sender is missing; in that case every send
/// fails with `NotConfigured` so the error surfaces at the notify stage.
#[derive(Clone)]
pub struct SmtpNotifier {
    inner: Result<SmtpSender, String>,
}

#[derive(Clone)]
struct SmtpSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(config: &EmailConfig) -> Self {
        let inner = Self::build_sender(config);
        match &inner {
            Ok(_) => tracing::info!(
                host = %config.smtp_host,
                port = config.smtp_port,
                starttls = config.smtp_tls,
                "Email service initialized"
            ),
            Err(reason) => tracing::warn!(
                reason = %reason,
                "Email sender not configured; notify stage will fail"
            ),
        }
        Self { inner }
    }

    fn build_sender(config: &EmailConfig) -> Result<SmtpSender, String> {
        let (user, pass) = config.sender()?;
        let from: Mailbox = user
            .parse()
            .map_err(|e| format!("EMAIL_USER is not a valid address: {}", e))?;
        let credentials = Credentials::new(user.to_string(), pass.to_string());

        let mailer = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| format!("SMTP relay {}: {}", config.smtp_host, e))?
                .port(config.smtp_port)
                .credentials(credentials)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .credentials(credentials)
                .build()
        };

        Ok(SmtpSender { mailer, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, email: NotificationEmail) -> Result<(), NotifyError> {
        let sender = self
            .inner
            .as_ref()
            .map_err(|reason| NotifyError::NotConfigured(reason.clone()))?;

        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
                address: email.to.clone(),
                reason: e.to_string(),
            })?;

        let message = Message::builder()
            .from(sender.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        sender
            .mailer
            .send(message)
            .await
            .map_err(|e| NotifyError::Rejected(e.to_string()))?;

        tracing::info!(to = %email.to, "Upload confirmation email sent");
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.inner.is_ok()
    }
}
