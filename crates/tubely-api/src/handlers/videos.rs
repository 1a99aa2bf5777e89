use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::upload::parse_video_id;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;
use uuid::Uuid;

/// Load a video and require that `user_id` owns it.
///
/// Non-owners get 401 with `not_owner_message`, same as a bad token.
pub(crate) async fn load_owned_video(
    state: &AppState,
    video_id: Uuid,
    user_id: Uuid,
    not_owner_message: &str,
) -> Result<Video, AppError> {
    let video = state
        .videos
        .get(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        tracing::warn!(video_id = %video_id, user_id = %user_id, "Access to video denied");
        return Err(AppError::Unauthorized(not_owner_message.to_string()));
    }

    Ok(video)
}

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoParams,
    responses(
        (status = 201, description = "Draft video created", body = Video),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, params), fields(user_id = %user.user_id))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ValidatedJson(params): ValidatedJson<CreateVideoParams>,
) -> Result<impl IntoResponse, HttpAppError> {
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()).into());
    }

    let video = state.videos.create(user.user_id, params).await?;
    tracing::info!(video_id = %video.id, "Video draft created");

    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos, newest first", body = [Video]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Video>>, HttpAppError> {
    let videos = state.videos.list_by_user(user.user_id).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "Video ID (UUID)")
    ),
    responses(
        (status = 200, description = "Video record", body = Video),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(video_id): Path<String>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = load_owned_video(
        &state,
        video_id,
        user.user_id,
        "You are not the owner of this video",
    )
    .await?;
    Ok(Json(video))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "Video ID (UUID)")
    ),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(video_id): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = load_owned_video(
        &state,
        video_id,
        user.user_id,
        "You are not the owner of this video",
    )
    .await?;

    if !state.videos.delete(video.id).await? {
        return Err(AppError::NotFound("Couldn't find video".to_string()).into());
    }

    remove_stored_objects(&state, &video).await;
    tracing::info!(video_id = %video.id, "Video deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Best-effort removal of the objects a deleted record pointed at.
async fn remove_stored_objects(state: &AppState, video: &Video) {
    if let Some(key) = video
        .video_url
        .as_deref()
        .and_then(|url| state.video_storage.key_from_url(url))
    {
        if let Err(e) = state.video_storage.delete(&key).await {
            tracing::warn!(error = %e, key = %key, "Failed to delete stored video");
        }
    }

    if let (Some(storage), Some(url)) = (state.thumbnails.as_local(), video.thumbnail_url.as_deref())
    {
        if let Some(key) = storage.key_from_url(url) {
            if let Err(e) = storage.delete(&key).await {
                tracing::warn!(error = %e, key = %key, "Failed to delete stored thumbnail");
            }
        }
    }
}
