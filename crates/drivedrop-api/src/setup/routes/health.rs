//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct ReadinessResponse {
    status: &'static str,
    storage_backend: &'static str,
    /// Whether uploads without a user token can be authorized
    storage_fallback: bool,
    email: bool,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - every upload can complete end to end only when a sender
/// is configured. A missing fallback credential does not block readiness since
/// browser uploads carry their own token.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let email = state.pipeline.notifier_configured();
    let response = ReadinessResponse {
        status: if email { "ready" } else { "not_ready" },
        storage_backend: state.pipeline.storage_backend(),
        storage_fallback: state.pipeline.storage_fallback_configured(),
        email,
    };
    let status = if email {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
