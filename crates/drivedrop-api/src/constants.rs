//! API paths and form field names

/// Upload endpoint path
pub const UPLOAD_PATH: &str = "/api/upload";

/// OpenAPI document path
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the notification address
pub const EMAIL_FIELD: &str = "email";

/// Multipart field carrying the user's bearer token (optional)
pub const TOKEN_FIELD: &str = "accessToken";
