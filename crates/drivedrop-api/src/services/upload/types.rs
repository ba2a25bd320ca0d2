//! Types used by the upload pipeline

use std::collections::HashMap;

use drivedrop_core::{FormValue, StoredObject, DEFAULT_MIME_TYPE, DEFAULT_OBJECT_NAME};
use tempfile::NamedTempFile;

/// File part spooled to disk while the request body is read.
///
/// The temp file is deleted when this value is dropped.
#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub size: u64,
    pub spool: NamedTempFile,
}

impl UploadedFile {
    /// Name to create the object under.
    ///
    /// Browsers may send a full client path; only the last component is kept.
    pub fn object_name(&self) -> String {
        self.original_name
            .as_deref()
            .map(|name| name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name).trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_OBJECT_NAME)
            .to_string()
    }

    pub fn mime_type(&self) -> String {
        self.content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string()
    }
}

/// Output of the decode stage: at most one file plus every text field seen.
#[derive(Debug, Default)]
pub struct DecodedForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, FormValue>,
}

impl DecodedForm {
    pub fn push_field(&mut self, name: String, value: String) {
        let entry = self.fields.remove(&name).unwrap_or_default();
        self.fields.insert(name, entry.push(value));
    }

    /// First non-blank value of a text field.
    pub fn take_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name).and_then(FormValue::into_first)
    }
}

/// A request that passed validation.
#[derive(Debug)]
pub struct UploadRequest {
    pub file: UploadedFile,
    pub email: String,
    pub access_token: Option<String>,
}

/// Result of a fully successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub stored: StoredObject,
    pub notified_to: String,
}
