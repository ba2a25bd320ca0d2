//! Error types module
//!
//! All pipeline failures are unified under the `AppError` enum. Each variant
//! self-describes how it is rendered over HTTP through the `ErrorMetadata` trait,
//! so the API layer never has to match on variants to pick a status code.

use std::io;

use crate::models::{Stage, StoredObject};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like missing form fields
    Debug,
    /// Warning level - for partial failures the operator should see
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_UPLOAD_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried by the client)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("{0}")]
    MissingInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Configuration error in {stage} stage: {message}")]
    Configuration { stage: Stage, message: String },

    #[error("Storage upload failed: {0}")]
    StorageUpload(String),

    #[error("Notification failed: {message}")]
    Notification {
        message: String,
        /// Object already created in storage before the email failed.
        stored: Option<StoredObject>,
    },

    #[error("{stage} stage timed out after {after_secs}s")]
    Timeout {
        stage: Stage,
        after_secs: u64,
        /// Object already created in storage before the timeout, if any.
        stored: Option<StoredObject>,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::MalformedRequest(_) => (
            400,
            "MALFORMED_REQUEST",
            false,
            Some("Send the form as multipart/form-data"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingInput(_) => (
            400,
            "MISSING_INPUT",
            false,
            Some("Select a file and enter an email address"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::MethodNotAllowed => (
            405,
            "METHOD_NOT_ALLOWED",
            false,
            Some("Submit the upload form with POST"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size"),
            false,
            LogLevel::Debug,
        ),
        AppError::Configuration { .. } => (
            500,
            "CONFIGURATION_ERROR",
            false,
            Some("Contact the site operator"),
            true,
            LogLevel::Error,
        ),
        AppError::StorageUpload(_) => (
            500,
            "STORAGE_UPLOAD_ERROR",
            true,
            Some("Sign in again and retry the upload"),
            false,
            LogLevel::Error,
        ),
        AppError::Notification { stored: Some(_), .. } => (
            500,
            "NOTIFICATION_ERROR",
            false,
            Some("The file was stored; only the email could not be sent"),
            false,
            LogLevel::Warn,
        ),
        AppError::Notification { stored: None, .. } => (
            500,
            "NOTIFICATION_ERROR",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Error,
        ),
        AppError::Timeout { stored: Some(_), .. } => (
            504,
            "TIMEOUT",
            false,
            Some("The file was stored; only the email could not be sent"),
            false,
            LogLevel::Warn,
        ),
        AppError::Timeout { stored: None, .. } => (
            504,
            "TIMEOUT",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Warn,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MalformedRequest(_) => "MalformedRequest",
            AppError::MissingInput(_) => "MissingInput",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::MethodNotAllowed => "MethodNotAllowed",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Configuration { .. } => "Configuration",
            AppError::StorageUpload(_) => "StorageUploadError",
            AppError::Notification { .. } => "NotificationError",
            AppError::Timeout { .. } => "TimeoutError",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// The storage object that exists despite this error, if any.
    pub fn stored_object(&self) -> Option<&StoredObject> {
        match self {
            AppError::Notification { stored, .. } | AppError::Timeout { stored, .. } => {
                stored.as_ref()
            }
            _ => None,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MalformedRequest(msg) => msg.clone(),
            AppError::MissingInput(msg) => msg.clone(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Configuration { stage, .. } => {
                format!("Server is not configured for the {} stage", stage)
            }
            AppError::StorageUpload(msg) => msg.clone(),
            AppError::Notification { message, .. } => message.clone(),
            AppError::Timeout { .. } => self.to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
