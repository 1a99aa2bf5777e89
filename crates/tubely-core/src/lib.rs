//! Tubely Core Library
//!
//! This crate provides the domain models, error types, configuration and token
//! helpers shared across all Tubely components.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, ThumbnailStorageMode};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
