//! Drivedrop API Library
//!
//! HTTP handlers, middleware and application setup for the upload-and-notify
//! server.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
mod telemetry;
mod utils;

pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::email::{NotificationEmail, Notifier, NotifyError, SmtpNotifier};
pub use services::upload::UploadPipeline;
pub use state::AppState;
