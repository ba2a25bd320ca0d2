use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::decode_upload_form;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use drivedrop_core::{AppError, UploadResponse};
use std::sync::Arc;

/// Upload one file to Google Drive and email a confirmation.
///
/// Dropping this future (client disconnect) cancels any in-flight remote call
/// and deletes the spooled file.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "Parts: `file` (binary), `email` (text), optional `accessToken` (text)"
    ),
    responses(
        (status = 200, description = "File stored and confirmation sent", body = UploadResponse),
        (status = 400, description = "Malformed form, missing file or email, or invalid email", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Configuration, storage or notification failure", body = ErrorResponse),
        (status = 504, description = "Storage or email call timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let form = decode_upload_form(multipart?).await?;
    let outcome = state.pipeline.run(form).await?;

    tracing::info!(
        file_id = %outcome.stored.id,
        notified_to = %outcome.notified_to,
        "Upload completed"
    );

    Ok(Json(UploadResponse::stored(&outcome.stored)))
}

/// Any method other than POST on the upload path.
pub async fn method_not_allowed() -> HttpAppError {
    HttpAppError(AppError::MethodNotAllowed)
}
