#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

/// Create the video storage backend selected by `STORAGE_BACKEND`
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = S3Storage::new(
                bucket,
                region,
                config.s3_endpoint.clone(),
                config.s3_public_base_url.clone(),
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path
                .clone()
                .unwrap_or_else(|| format!("{}/videos", config.assets_root.trim_end_matches('/')));
            let base_url = config
                .local_storage_base_url
                .clone()
                .unwrap_or_else(|| format!("{}/videos", config.assets_base_url()));

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> Config {
        let assets_root = dir.path().to_string_lossy().to_string();
        Config::from_lookup(move |key| match key {
            "DATABASE_URL" => Some("postgres://localhost/tubely".to_string()),
            "JWT_SECRET" => Some("secret".to_string()),
            "STORAGE_BACKEND" => Some("local".to_string()),
            "ASSETS_ROOT" => Some(assets_root.clone()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn local_backend_defaults_under_assets() {
        let dir = TempDir::new().unwrap();
        let storage = create_storage(&config_for(&dir)).await.unwrap();

        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert_eq!(
            storage.public_url("landscape/a.mp4"),
            "http://localhost:8091/assets/videos/landscape/a.mp4"
        );
        assert!(dir.path().join("videos").is_dir());
    }

    #[cfg(feature = "storage-s3")]
    #[tokio::test]
    async fn s3_backend_requires_bucket() {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/tubely".to_string()),
            "JWT_SECRET" => Some("secret".to_string()),
            "S3_REGION" => Some("us-east-2".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(matches!(
            create_storage(&config).await,
            Err(StorageError::ConfigError(_))
        ));
    }
}
