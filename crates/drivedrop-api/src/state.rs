//! Application state shared by every handler.

use drivedrop_core::Config;

use crate::services::upload::UploadPipeline;

pub struct AppState {
    pub config: Config,
    pub pipeline: UploadPipeline,
    /// Form page rendered once at startup with the public client id.
    pub index_html: String,
}

impl AppState {
    pub fn new(config: Config, pipeline: UploadPipeline) -> Self {
        let index_html =
            crate::handlers::form_page::render_index(config.storage.public_client_id.as_deref());
        Self {
            config,
            pipeline,
            index_html,
        }
    }
}
