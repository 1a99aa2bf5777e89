//! Tubely HTTP API.
//!
//! The binary in `main.rs` wires configuration into [`setup::initialize_app`];
//! integration tests build the same router from an in-memory [`state::AppState`]
//! through [`setup::routes::setup_routes`].

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, ThumbnailStore};
