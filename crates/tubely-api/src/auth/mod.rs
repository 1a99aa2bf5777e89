pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, get_bearer_token, AuthState};
pub use models::AuthenticatedUser;
