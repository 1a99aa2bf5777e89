use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::videos::load_owned_video;
use crate::state::{AppState, ThumbnailStore};
use crate::utils::upload::{parse_video_id, read_field_limited, UploadKind};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::Video;
use tubely_processing::ValidationError;
use tubely_storage::encode_data_url;
use tubely_storage::keys::{extension_for_content_type, random_file_name};

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{video_id}",
    tag = "uploads",
    params(
        ("video_id" = String, Path, description = "Video ID (UUID)")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored", body = Video),
        (status = 400, description = "Missing, empty, or unsupported file", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.user_id))]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let kind = UploadKind::Thumbnail;

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
            .thumbnail_validator
            .validate_content_type(field.content_type().unwrap_or_default())
            .map_err(|e| kind.rejection(e))?;
        let data = read_field_limited(kind, field, &state.thumbnail_validator).await?;
        upload = Some((content_type, data));
        break;
    }
    let (content_type, data) = upload.ok_or_else(|| {
        kind.rejection(ValidationError::MissingField(kind.field_name().to_string()))
    })?;

    let mut video = load_owned_video(
        &state,
        video_id,
        user.user_id,
        "You are not allowed to upload a thumbnail for this video",
    )
    .await?;

    let size_bytes = data.len();
    let thumbnail_url = match &state.thumbnails {
        ThumbnailStore::Local(storage) => {
            let extension = extension_for_content_type(&content_type).ok_or_else(|| {
                kind.rejection(ValidationError::InvalidContentType {
                    content_type: content_type.clone(),
                    allowed: Vec::new(),
                })
            })?;
            storage
                .upload_with_key(&random_file_name(extension), data, &content_type)
                .await?
        }
        ThumbnailStore::Inline => encode_data_url(&content_type, &data),
    };

    video.thumbnail_url = Some(thumbnail_url);
    let video = state.videos.update(&video).await?;

    tracing::info!(
        video_id = %video.id,
        content_type = %content_type,
        size_bytes,
        "Thumbnail uploaded"
    );

    Ok(Json(video))
}
