use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutMultipartOptions, PutOptions,
    PutPayload, Result as ObjectResult, WriteMultipart,
};
use tokio::io::AsyncReadExt;

/// Part size for multipart uploads; S3 rejects smaller parts except the last.
const MULTIPART_CHUNK_SIZE: usize = 5 * 1024 * 1024;
const MAX_PARTS_IN_FLIGHT: usize = 4;
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_base_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Optional base for returned object URLs, typically a CDN
    ///   distribution in front of the bucket
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials come from the usual AWS_* environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            public_base_url,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Object URL for `key`.
///
/// A public base URL wins; otherwise S3-compatible endpoints are addressed
/// path-style and AWS virtual-hosted-style.
fn object_url(
    bucket: &str,
    region: &str,
    endpoint_url: Option<&str>,
    public_base_url: Option<&str>,
    key: &str,
) -> String {
    if let Some(base) = public_base_url {
        return format!("{}/{}", base.trim_end_matches('/'), key);
    }
    match endpoint_url {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

fn content_type_attributes(content_type: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.to_string().into());
    attributes
}

/// Copy a local file into `store` as a multipart upload, holding at most a few
/// parts in memory. Returns the number of bytes written.
async fn stream_file_to_store(
    store: &dyn ObjectStore,
    location: &Path,
    file_path: &std::path::Path,
    content_type: &str,
    chunk_size: usize,
) -> StorageResult<u64> {
    let mut file = tokio::fs::File::open(file_path).await?;

    let options = PutMultipartOptions {
        attributes: content_type_attributes(content_type),
        ..Default::default()
    };
    let upload = store
        .put_multipart_opts(location, options)
        .await
        .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
    let mut writer = WriteMultipart::new_with_chunk_size(upload, chunk_size);

    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut written = 0u64;
    loop {
        let read = match file.read(&mut buffer).await {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        location = %location,
                        "Failed to abort multipart upload"
                    );
                }
                return Err(StorageError::IoError(e));
            }
        };
        if let Err(e) = writer.wait_for_capacity(MAX_PARTS_IN_FLIGHT).await {
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(
                    error = %abort_err,
                    location = %location,
                    "Failed to abort multipart upload"
                );
            }
            return Err(StorageError::UploadFailed(e.to_string()));
        }
        writer.write(&buffer[..read]);
        written += read as u64;
    }

    writer
        .finish()
        .await
        .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

    Ok(written)
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;

        let size = data.len() as u64;
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let options = PutOptions {
            attributes: content_type_attributes(content_type),
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.public_url(storage_key))
    }

    /// Files of at least one part are streamed as a multipart upload instead
    /// of being read into memory.
    async fn upload_file(
        &self,
        storage_key: &str,
        path: &std::path::Path,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;

        let size = tokio::fs::metadata(path).await?.len();
        if size < MULTIPART_CHUNK_SIZE as u64 {
            let data = tokio::fs::read(path).await?;
            return self.upload_with_key(storage_key, data, content_type).await;
        }

        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let written = stream_file_to_store(
            &self.store,
            &location,
            path,
            content_type,
            MULTIPART_CHUNK_SIZE,
        )
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 multipart upload failed"
            );
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 multipart upload successful"
        );

        Ok(self.public_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        validate_key(storage_key)?;
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(bucket = %self.bucket, key = %storage_key, "S3 delete successful");

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        let location = Path::from(storage_key.to_string());

        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        object_url(
            &self.bucket,
            &self.region,
            self.endpoint_url.as_deref(),
            self.public_base_url.as_deref(),
            storage_key,
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aws_virtual_hosted_url() {
        assert_eq!(
            object_url("tubely-123", "us-east-2", None, None, "landscape/a.mp4"),
            "https://tubely-123.s3.us-east-2.amazonaws.com/landscape/a.mp4"
        );
    }

    #[test]
    fn custom_endpoint_uses_path_style() {
        assert_eq!(
            object_url(
                "tubely",
                "us-east-1",
                Some("http://localhost:9000/"),
                None,
                "portrait/b.mp4"
            ),
            "http://localhost:9000/tubely/portrait/b.mp4"
        );
    }

    #[test]
    fn public_base_url_takes_precedence() {
        assert_eq!(
            object_url(
                "tubely",
                "us-east-1",
                Some("http://localhost:9000"),
                Some("https://d111111abcdef8.cloudfront.net/"),
                "other/c.mp4"
            ),
            "https://d111111abcdef8.cloudfront.net/other/c.mp4"
        );
    }

    #[test]
    fn url_round_trips_to_key() {
        let storage = S3Storage::new(
            "tubely".to_string(),
            "us-east-2".to_string(),
            None,
            None,
        )
        .unwrap();
        let url = storage.public_url("landscape/a.mp4");
        assert_eq!(storage.key_from_url(&url).as_deref(), Some("landscape/a.mp4"));
        assert_eq!(storage.backend_type(), StorageBackend::S3);
    }

    #[tokio::test]
    async fn file_streams_as_multipart_with_content_type() {
        let store = object_store::memory::InMemory::new();
        let location = Path::from("landscape/big.mp4");
        let contents: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let file = tempfile::NamedTempFile::new().unwrap();
        tokio::fs::write(file.path(), &contents).await.unwrap();

        let written = stream_file_to_store(&store, &location, file.path(), "video/mp4", 1024)
            .await
            .unwrap();
        assert_eq!(written, 5000);

        let stored = store.get(&location).await.unwrap();
        assert_eq!(
            stored
                .attributes
                .get(&Attribute::ContentType)
                .map(|v| AsRef::<str>::as_ref(v)),
            Some("video/mp4")
        );
        assert_eq!(stored.bytes().await.unwrap().to_vec(), contents);
    }

    #[tokio::test]
    async fn missing_file_fails_before_upload_starts() {
        let store = object_store::memory::InMemory::new();
        let location = Path::from("landscape/none.mp4");
        let err = stream_file_to_store(
            &store,
            &location,
            std::path::Path::new("/definitely/not/here.mp4"),
            "video/mp4",
            1024,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorageError::IoError(_)));
        assert!(store.head(&location).await.is_err());
    }
}
