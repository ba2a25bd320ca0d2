//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Any `AppError` (or a
//! type that converts into one) becomes an `HttpAppError` via `?` and renders
//! with a consistent status, body and log line.

use axum::{
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use drivedrop_core::{AppError, Config, ErrorMetadata, LogLevel, StoredObject};
use serde::Serialize;
use std::sync::OnceLock;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    /// Object that was created in storage even though the request failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<StoredObject>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: IntoResponse and AppError are both foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// The request body is not a multipart form at all.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::MalformedRequest(rejection.body_text()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let stored_id = error.stored_object().map(|o| o.id.as_str());
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(
                error = %error,
                error_type = error_type,
                stored_file_id = ?stored_id,
                "Error occurred"
            );
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                stored_file_id = ?stored_id,
                "Error occurred"
            );
        }
    }
}

static PRODUCTION_MODE: OnceLock<bool> = OnceLock::new();

/// Record once, from the loaded configuration, whether error details are
/// hidden from clients. Later calls are ignored.
pub fn init_error_rendering(config: &Config) {
    if PRODUCTION_MODE.set(config.is_production()).is_err() {
        tracing::debug!("Error rendering mode already initialized");
    }
}

fn is_production() -> bool {
    PRODUCTION_MODE.get().copied().unwrap_or(false)
}

impl HttpAppError {
    fn error_response(&self, is_production: bool) -> ErrorResponse {
        let app_error = &self.0;
        let hide_details = is_production || app_error.is_sensitive();
        ErrorResponse {
            error: app_error.client_message(),
            details: (!hide_details).then(|| app_error.detailed_message()),
            error_type: (!hide_details).then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
            stored: app_error.stored_object().cloned(),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        (status, Json(self.error_response(is_production()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivedrop_core::Stage;

    #[test]
    fn test_missing_input_body() {
        let err = HttpAppError(AppError::MissingInput("Missing file or email".to_string()));
        let json = serde_json::to_value(err.error_response(true)).expect("serialize");
        assert_eq!(json["error"], "Missing file or email");
        assert_eq!(json["code"], "MISSING_INPUT");
        assert!(json.get("details").is_none());
        assert!(json.get("stored").is_none());
    }

    #[test]
    fn test_details_only_outside_production() {
        let err = HttpAppError(AppError::StorageUpload("Drive returned 403".to_string()));
        let dev = serde_json::to_value(err.error_response(false)).expect("serialize");
        assert_eq!(dev["error"], "Drive returned 403");
        assert_eq!(dev["error_type"], "StorageUploadError");
        assert!(dev["details"].as_str().is_some());

        let prod = serde_json::to_value(err.error_response(true)).expect("serialize");
        assert!(prod.get("details").is_none());
        assert!(prod.get("error_type").is_none());
    }

    #[test]
    fn test_sensitive_errors_never_expose_details() {
        let err = HttpAppError(AppError::Configuration {
            stage: Stage::Authorize,
            message: "GOOGLE_REFRESH_TOKEN not set".to_string(),
        });
        let json = serde_json::to_value(err.error_response(false)).expect("serialize");
        assert_eq!(json["error"], "Server is not configured for the authorize stage");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_partial_success_carries_stored_object() {
        let err = HttpAppError(AppError::Notification {
            message: "Email could not be sent".to_string(),
            stored: Some(StoredObject {
                id: "1AbC".to_string(),
                name: "report.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
            }),
        });
        let json = serde_json::to_value(err.error_response(true)).expect("serialize");
        assert_eq!(json["code"], "NOTIFICATION_ERROR");
        assert_eq!(json["stored"]["id"], "1AbC");
        assert_eq!(json["stored"]["name"], "report.pdf");
    }

    #[test]
    fn test_status_mapping() {
        let response = HttpAppError(AppError::MethodNotAllowed).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = HttpAppError(AppError::Timeout {
            stage: Stage::Upload,
            after_secs: 1,
            stored: None,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_production_mode_comes_from_config() {
        let production = Config::from_lookup(|key| {
            (key == "ENVIRONMENT").then(|| "production".to_string())
        })
        .expect("config");
        let development = Config::from_lookup(|_| None).expect("config");

        init_error_rendering(&production);
        init_error_rendering(&development);

        assert!(is_production());
    }
}
