//! Application bootstrap: database, storage backends, prober, and router.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_processing::FfprobeProber;

/// Initialize the application (telemetry, database, storage, routes)
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    config.validate().context("Invalid configuration")?;

    crate::telemetry::init_telemetry(config.log_json)?;
    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        thumbnail_storage = %config.thumbnail_storage,
        "Starting Tubely"
    );

    let pool = database::setup_database(&config).await?;
    let video_storage = storage::setup_video_storage(&config).await?;
    let thumbnails = storage::setup_thumbnail_store(&config).await?;
    let prober = FfprobeProber::new(config.ffprobe_path.clone())
        .with_timeout(config.ffprobe_timeout());

    let state = Arc::new(AppState::new(
        config,
        Arc::new(PgVideoRepository::new(pool)),
        video_storage,
        thumbnails,
        Arc::new(prober),
    ));

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
