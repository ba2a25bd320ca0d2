//! Drivedrop Storage Library
//!
//! Storage abstraction used by the upload pipeline and its Google Drive
//! implementation. A request's credential is passed into every call; the
//! backend itself holds no per-user state.

pub mod google_drive;
pub mod oauth;
pub mod traits;

// Re-export commonly used types
pub use google_drive::GoogleDriveStorage;
pub use oauth::TokenExchange;
pub use traits::{ObjectBody, ObjectMetadata, ObjectStorage, StorageError, StorageResult};
