//! Google Drive v3 storage backend
//!
//! Objects are created with a single `uploadType=multipart` request whose body is
//! a `multipart/related` envelope: a JSON metadata part followed by the media
//! part. The media part is streamed straight from the object body.

use async_trait::async_trait;
use bytes::Bytes;
use drivedrop_core::{Credential, StorageConfig, StoredObject};
use futures::{future, stream, StreamExt};
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::oauth::TokenExchange;
use crate::traits::{ObjectBody, ObjectMetadata, ObjectStorage, StorageError, StorageResult};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DriveFileMetadata<'a> {
    name: &'a str,
    mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parents: Option<[&'a str; 1]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveErrorEnvelope {
    error: DriveErrorBody,
}

#[derive(Debug, Deserialize)]
struct DriveErrorBody {
    message: String,
}

/// Framing around the media bytes of a `multipart/related` upload body.
#[derive(Debug)]
pub(crate) struct RelatedEnvelope {
    pub boundary: String,
    pub head: Bytes,
    pub tail: Bytes,
}

impl RelatedEnvelope {
    pub(crate) fn new(metadata_json: &[u8], media_type: &str) -> Self {
        let boundary = format!("drivedrop_{}", uuid::Uuid::new_v4().simple());

        let mut head = Vec::with_capacity(metadata_json.len() + 160);
        head.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        head.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        head.extend_from_slice(metadata_json);
        head.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
        head.extend_from_slice(format!("Content-Type: {}\r\n\r\n", media_type).as_bytes());

        let tail = format!("\r\n--{}--\r\n", boundary);

        Self {
            boundary,
            head: Bytes::from(head),
            tail: Bytes::from(tail),
        }
    }

    pub(crate) fn content_type(&self) -> String {
        format!("multipart/related; boundary={}", self.boundary)
    }

    pub(crate) fn content_length(&self, media_len: u64) -> u64 {
        self.head.len() as u64 + media_len + self.tail.len() as u64
    }
}

/// Google Drive storage implementation
#[derive(Clone, Debug)]
pub struct GoogleDriveStorage {
    http_client: reqwest::Client,
    upload_url: String,
    folder_id: Option<String>,
    token_exchange: TokenExchange,
}

impl GoogleDriveStorage {
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create HTTP client for Drive: {}", e))
            })?;

        Ok(Self::with_client(
            http_client,
            config.upload_url.clone(),
            config.token_url.clone(),
            config.folder_id.clone(),
        ))
    }

    pub fn with_client(
        http_client: reqwest::Client,
        upload_url: String,
        token_url: String,
        folder_id: Option<String>,
    ) -> Self {
        Self {
            token_exchange: TokenExchange::new(http_client.clone(), token_url),
            http_client,
            upload_url,
            folder_id,
        }
    }

    async fn bearer_token(&self, credential: &Credential) -> StorageResult<String> {
        match credential {
            Credential::UserToken(token) => Ok(token.clone()),
            Credential::ServiceAccount(account) => self.token_exchange.access_token(account).await,
        }
    }
}

fn truncate_error_body(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_BODY_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", cut)
    }
}

fn drive_error_message(status: StatusCode, text: &str) -> String {
    let reason = serde_json::from_str::<DriveErrorEnvelope>(text)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| truncate_error_body(text));
    if reason.is_empty() {
        format!("Drive returned {}", status)
    } else {
        format!("Drive returned {}: {}", status, reason)
    }
}

#[async_trait]
impl ObjectStorage for GoogleDriveStorage {
    async fn create_object(
        &self,
        credential: &Credential,
        metadata: ObjectMetadata,
        body: ObjectBody,
    ) -> StorageResult<StoredObject> {
        let access_token = self.bearer_token(credential).await?;

        let drive_metadata = DriveFileMetadata {
            name: &metadata.name,
            mime_type: &metadata.mime_type,
            parents: self.folder_id.as_deref().map(|id| [id]),
        };
        let metadata_json = serde_json::to_vec(&drive_metadata)
            .map_err(|e| StorageError::UploadFailed(format!("Failed to encode metadata: {}", e)))?;

        let envelope = RelatedEnvelope::new(&metadata_json, &metadata.mime_type);
        let content_length = envelope.content_length(body.len());
        let content_type = envelope.content_type();

        let media = ReaderStream::new(body.into_file());
        let payload = stream::once(future::ready(Ok::<Bytes, std::io::Error>(
            envelope.head.clone(),
        )))
        .chain(media)
        .chain(stream::once(future::ready(Ok(envelope.tail.clone()))));

        tracing::debug!(
            name = %metadata.name,
            mime_type = %metadata.mime_type,
            content_length,
            credential = credential.kind(),
            "Creating Drive file"
        );

        let response = self
            .http_client
            .post(&self.upload_url)
            .query(&[("uploadType", "multipart"), ("fields", "id,name,mimeType")])
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, content_length)
            .body(reqwest::Body::wrap_stream(payload))
            .send()
            .await
            .map_err(|e| StorageError::Interrupted(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = drive_error_message(status, &text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    StorageError::CredentialRejected(message)
                }
                _ => StorageError::UploadFailed(message),
            });
        }

        let file: DriveFile = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        tracing::info!(file_id = %file.id, name = %metadata.name, "Drive file created");

        Ok(StoredObject {
            id: file.id,
            name: file.name.unwrap_or(metadata.name),
            mime_type: file.mime_type.unwrap_or(metadata.mime_type),
        })
    }

    fn backend_name(&self) -> &'static str {
        "google-drive"
    }
}
