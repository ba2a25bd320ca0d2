//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod validation;

use crate::services::email::SmtpNotifier;
use crate::services::upload::UploadPipeline;
use crate::state::AppState;
use anyhow::{Context, Result};
use drivedrop_core::Config;
use drivedrop_storage::GoogleDriveStorage;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_tracing(config.base.log_format);
    crate::error::init_error_rendering(&config);

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let storage = GoogleDriveStorage::new(&config.storage)
        .context("Failed to initialize Google Drive client")?;
    let notifier = SmtpNotifier::from_config(&config.email);
    let pipeline = UploadPipeline::from_config(&config, Arc::new(storage), Arc::new(notifier));

    let state = Arc::new(AppState::new(config.clone(), pipeline));
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
