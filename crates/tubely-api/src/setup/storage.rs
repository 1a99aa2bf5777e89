//! Storage backends for videos and thumbnails

use crate::state::ThumbnailStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::{Config, ThumbnailStorageMode};
use tubely_storage::{create_storage, LocalStorage, Storage};

pub async fn setup_video_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize video storage")?;
    tracing::info!(backend = %storage.backend_type(), "Video storage ready");
    Ok(storage)
}

pub async fn setup_thumbnail_store(config: &Config) -> Result<ThumbnailStore> {
    match config.thumbnail_storage {
        ThumbnailStorageMode::Local => {
            let storage = LocalStorage::new(&config.assets_root, config.assets_base_url())
                .await
                .context("Failed to initialize thumbnail storage")?;
            tracing::info!(assets_root = %config.assets_root, "Thumbnails stored on disk");
            Ok(ThumbnailStore::Local(Arc::new(storage)))
        }
        ThumbnailStorageMode::Inline => {
            tracing::info!("Thumbnails stored inline as data URLs");
            Ok(ThumbnailStore::Inline)
        }
    }
}
