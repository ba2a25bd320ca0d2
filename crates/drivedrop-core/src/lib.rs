//! Drivedrop Core Library
//!
//! Configuration, error taxonomy, credentials and request-scoped models shared
//! by the API server, the storage client and the form client.

pub mod config;
pub mod credential;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, EmailConfig, LogFormat, StorageConfig};
pub use credential::{Credential, ServiceAccount};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    FormValue, Stage, StoredObject, UploadResponse, DEFAULT_MIME_TYPE, DEFAULT_OBJECT_NAME,
};
