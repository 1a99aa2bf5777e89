use crate::auth::AuthenticatedUser;
use crate::constants::VIDEO_EXTENSION;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::videos::load_owned_video;
use crate::state::AppState;
use crate::utils::upload::{parse_video_id, stream_field_to_file, UploadKind};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_processing::{classify_aspect, ValidationError};
use tubely_storage::keys::prefixed_key;

#[utoipa::path(
    post,
    path = "/api/video_upload/{video_id}",
    tag = "uploads",
    params(
        ("video_id" = String, Path, description = "Video ID (UUID)")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video stored under its aspect-ratio prefix", body = Video),
        (status = 400, description = "Missing, empty, unsupported, or unreadable file", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Probe or storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.user_id))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let kind = UploadKind::Video;

    let mut video = load_owned_video(
        &state,
        video_id,
        user.user_id,
        "You are not the owner of this video",
    )
    .await?;

    let start = Instant::now();
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| kind.multipart_error(e))?
    {
        if field.name() != Some(kind.field_name()) {
            continue;
        }

        let content_type = state
            .video_validator
            .validate_content_type(field.content_type().unwrap_or_default())
            .map_err(|e| kind.rejection(e))?;

        // Removed when dropped, on every exit path
        let temp_file = tempfile::Builder::new()
            .prefix("tubely-upload-")
            .suffix(&format!(".{}", VIDEO_EXTENSION))
            .tempfile()
            .map_err(AppError::from)?;
        let size_bytes =
            stream_field_to_file(kind, field, temp_file.path(), &state.video_validator).await?;

        upload = Some((temp_file, content_type, size_bytes));
        break;
    }
    let (temp_file, content_type, size_bytes) = upload.ok_or_else(|| {
        kind.rejection(ValidationError::MissingField(kind.field_name().to_string()))
    })?;

    let aspect = classify_aspect(state.prober.as_ref(), temp_file.path()).await?;

    let key = prefixed_key(aspect.storage_prefix(), VIDEO_EXTENSION);
    let video_url = state
        .video_storage
        .upload_file(&key, temp_file.path(), &content_type)
        .await?;

    video.video_url = Some(video_url);
    let video = state.videos.update(&video).await?;

    tracing::info!(
        video_id = %video.id,
        key = %key,
        aspect = %aspect,
        size_bytes,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Video uploaded"
    );

    Ok(Json(video))
}
