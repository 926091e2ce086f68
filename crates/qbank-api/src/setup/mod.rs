//! Application setup and initialization
//!
//! All application initialization logic lives here rather than in main.rs:
//! database pool and migrations, the storage retrieval chain, repositories,
//! and route wiring.

pub mod database;
pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::Result;
use qbank_core::Config;
use qbank_db::{QuestionRepository, UserRepository};
use qbank_storage::{CloudSigner, FileLocator, UrlSigner};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::error::set_production_mode(config.is_production());

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup the storage retrieval chain
    let signer: Arc<dyn UrlSigner> = Arc::new(CloudSigner::new(
        &config.storage.base_url,
        &config.storage.cloud_name,
        &config.storage.api_secret,
    ));
    let locator = FileLocator::new(&config.storage, signer)?;

    let state = Arc::new(AppState {
        questions: QuestionRepository::new(pool.clone()),
        users: UserRepository::new(pool),
        locator,
        config: config.clone(),
    });

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
