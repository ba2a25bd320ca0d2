//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use drivedrop_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Drivedrop API",
        version = "0.1.0",
        description = "Upload a single file to Google Drive and receive an email confirmation."
    ),
    paths(handlers::upload::upload_file),
    components(schemas(
        models::UploadResponse,
        models::StoredObject,
        error::ErrorResponse,
    )),
    tags((name = "upload", description = "File upload and notification"))
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
