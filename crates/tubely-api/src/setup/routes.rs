//! Router assembly

use crate::api_doc::ApiDoc;
use crate::auth::{auth_middleware, AuthState};
use crate::constants::MULTIPART_OVERHEAD_BYTES;
use crate::handlers::{health, thumbnail_upload, video_upload, videos};
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, StorageBackend};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

pub fn setup_routes(state: Arc<AppState>) -> Result<Router> {
    let config = &state.config;
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        jwt_secret: config.jwt_secret.clone(),
    });

    let thumbnail_body_limit = config.max_thumbnail_size_bytes + MULTIPART_OVERHEAD_BYTES;
    let video_body_limit = config.max_video_size_bytes + MULTIPART_OVERHEAD_BYTES;

    let public_routes = Router::new()
        .route("/api/healthz", get(health::healthz))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

    let protected_routes = Router::new()
        .route(
            "/api/videos",
            post(videos::create_video).get(videos::list_videos),
        )
        .route(
            "/api/videos/{video_id}",
            get(videos::get_video).delete(videos::delete_video),
        )
        .route(
            "/api/thumbnail_upload/{video_id}",
            post(thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(thumbnail_body_limit)),
        )
        .route(
            "/api/video_upload/{video_id}",
            post(video_upload::upload_video).layer(DefaultBodyLimit::max(video_body_limit)),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let mut app = public_routes.merge(protected_routes);

    // Local thumbnails and the local video backend both live under ASSETS_ROOT
    if state.thumbnails.as_local().is_some() || config.storage_backend == StorageBackend::Local {
        app = app.nest_service("/assets", ServeDir::new(&config.assets_root));
    }

    let app = app
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if config.cors_origins.iter().any(|o| o == "*") {
        if !config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any))
}
