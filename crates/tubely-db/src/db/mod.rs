//! Video repositories
//!
//! `VideoRepository` is the seam handlers depend on. `PgVideoRepository` is the
//! production implementation; `InMemoryVideoRepository` backs tests and local
//! experiments without a database.

mod memory;
mod video;

pub use memory::InMemoryVideoRepository;
pub use video::{PgVideoRepository, VideoRepository};
