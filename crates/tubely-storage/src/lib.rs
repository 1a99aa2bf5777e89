//! Tubely Storage Library
//!
//! Storage abstraction plus S3 and local filesystem backends.
//!
//! # Storage key format
//!
//! Videos are stored as `{prefix}/{name}.{ext}` where the prefix is the aspect
//! class (`landscape`, `portrait`, `other`) and the name is 32 random bytes in
//! URL-safe base64. Thumbnails are stored flat as `{name}.{ext}`.
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod data_url;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use data_url::encode_data_url;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
