//! Tubely data access layer

pub mod db;

pub use db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};
