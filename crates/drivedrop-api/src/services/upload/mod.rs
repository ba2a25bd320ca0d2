//! Upload pipeline: validate → authorize → upload → notify

mod service;
mod types;

pub use service::UploadPipeline;
pub use types::{DecodedForm, UploadOutcome, UploadRequest, UploadedFile};
