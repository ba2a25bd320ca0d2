//! Multipart decoding for the upload endpoint

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use drivedrop_core::AppError;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::constants::FILE_FIELD;
use crate::services::upload::{DecodedForm, UploadedFile};

/// Map a multipart read failure. Hitting the body limit is a 413, anything
/// else means the body is not a well-formed multipart stream.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::MalformedRequest(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Decode the whole request body.
///
/// The first part named `file` that carries a `filename` attribute is streamed
/// to a temp file; later file parts are skipped. Every other part, including a
/// `file` part without a filename, is collected as a text field.
pub async fn decode_upload_form(mut multipart: Multipart) -> Result<DecodedForm, AppError> {
    let mut form = DecodedForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string).unwrap_or_default();

        if name == FILE_FIELD && field.file_name().is_some() {
            if form.file.is_some() {
                tracing::debug!("Ignoring extra file part");
                continue;
            }
            form.file = Some(spool_file(field).await?);
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.push_field(name, value);
        }
    }

    Ok(form)
}

async fn spool_file(mut field: Field<'_>) -> Result<UploadedFile, AppError> {
    let original_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    let spool = NamedTempFile::new()?;
    let mut out = tokio::fs::File::from_std(spool.as_file().try_clone()?);
    let mut size: u64 = 0;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        out.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    out.flush().await?;

    tracing::debug!(
        file_name = ?original_name,
        content_type = ?content_type,
        size,
        "File part spooled"
    );

    Ok(UploadedFile {
        original_name,
        content_type,
        size,
        spool,
    })
}
