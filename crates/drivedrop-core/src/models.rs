//! Request-scoped domain types shared by the server, the storage client and the form client.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Object name used when the upload carries no original filename.
pub const DEFAULT_OBJECT_NAME: &str = "uploaded-file";

/// MIME type used when the upload declares none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// One sequential step of the upload pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Validate,
    Authorize,
    Upload,
    Notify,
    Respond,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Decode => "decode",
            Stage::Validate => "validate",
            Stage::Authorize => "authorize",
            Stage::Upload => "upload",
            Stage::Notify => "notify",
            Stage::Respond => "respond",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a decoded form field.
///
/// Multipart parsers may hand back nothing, one value, or several values for the
/// same field name. Downstream code only ever sees the normalized `Option<String>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormValue {
    #[default]
    Absent,
    Single(String),
    Many(Vec<String>),
}

impl FormValue {
    /// Record another value for the same field name.
    pub fn push(self, value: String) -> Self {
        match self {
            FormValue::Absent => FormValue::Single(value),
            FormValue::Single(first) => FormValue::Many(vec![first, value]),
            FormValue::Many(mut values) => {
                values.push(value);
                FormValue::Many(values)
            }
        }
    }

    /// Normalize to the first value. Blank values count as absent.
    pub fn into_first(self) -> Option<String> {
        let first = match self {
            FormValue::Absent => None,
            FormValue::Single(value) => Some(value),
            FormValue::Many(values) => values.into_iter().next(),
        };
        first.filter(|v| !v.trim().is_empty())
    }
}

/// Object created in remote storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredObject {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

/// Body returned by the upload endpoint on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl UploadResponse {
    pub fn stored(object: &StoredObject) -> Self {
        Self {
            success: true,
            file_id: Some(object.id.clone()),
        }
    }
}
