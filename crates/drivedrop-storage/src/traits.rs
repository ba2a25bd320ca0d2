//! Storage abstraction trait
//!
//! This module defines the `ObjectStorage` trait the upload pipeline talks to.
//! The pipeline only needs one operation: create an object from a stream under
//! a given credential.

use async_trait::async_trait;
use drivedrop_core::{AppError, Credential, Stage, StoredObject};
use std::path::Path;
use thiserror::Error;
use tokio::fs::File;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage rejected the credential: {0}")]
    CredentialRejected(String),

    #[error("Credential exchange failed: {0}")]
    CredentialExchange(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Transfer interrupted: {0}")]
    Interrupted(String),

    #[error("Unexpected storage response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConfigError(message) => AppError::Configuration {
                stage: Stage::Upload,
                message,
            },
            other => AppError::StorageUpload(other.to_string()),
        }
    }
}

/// Declared attributes of the object to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub name: String,
    pub mime_type: String,
}

/// Binary content of an object, read as a stream.
///
/// The file handle is owned here and closed when the body is dropped, whether
/// the upload completed, failed or was cancelled.
#[derive(Debug)]
pub struct ObjectBody {
    file: File,
    len: u64,
}

impl ObjectBody {
    pub fn new(file: File, len: u64) -> Self {
        Self { file, len }
    }

    /// Open a file on disk as an object body.
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let file = File::open(path).await?;
        let len = file.metadata().await?.len();
        Ok(Self { file, len })
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn into_file(self) -> File {
        self.file
    }
}

/// Remote object storage
///
/// Implementations must not retry: a failure is reported once and the caller
/// decides what to do with it.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Create one object from `body` under `credential` and return what the
    /// provider recorded.
    async fn create_object(
        &self,
        credential: &Credential,
        metadata: ObjectMetadata,
        body: ObjectBody,
    ) -> StorageResult<StoredObject>;

    /// Short backend name for logs and readiness output
    fn backend_name(&self) -> &'static str;
}
