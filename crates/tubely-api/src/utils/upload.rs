//! Common utilities for file upload handlers

use crate::constants::{THUMBNAIL_FIELD, VIDEO_FIELD};
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tubely_core::AppError;
use tubely_processing::{MediaValidator, ValidationError};
use uuid::Uuid;

/// Parse the `{video_id}` path segment
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid video ID".to_string()))
}

/// The two kinds of multipart upload, used to phrase client-facing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Thumbnail,
    Video,
}

impl UploadKind {
    pub fn field_name(self) -> &'static str {
        match self {
            UploadKind::Thumbnail => THUMBNAIL_FIELD,
            UploadKind::Video => VIDEO_FIELD,
        }
    }

    /// Maps a validation failure to the client error for this upload. Handlers
    /// route every `ValidationError` through here.
    pub fn rejection(self, err: ValidationError) -> AppError {
        tracing::debug!(error = %err, upload = self.field_name(), "Upload rejected");
        match (self, err) {
            (UploadKind::Thumbnail, ValidationError::FileTooLarge { .. }) => {
                AppError::PayloadTooLarge("Thumbnail file too large".to_string())
            }
            (UploadKind::Video, ValidationError::FileTooLarge { .. }) => {
                AppError::PayloadTooLarge("Video file too large".to_string())
            }
            (_, ValidationError::InvalidContentType { .. }) => {
                AppError::InvalidInput(format!("Invalid {} file type", self.field_name()))
            }
            (_, ValidationError::MissingField(_)) => {
                AppError::BadRequest(format!("Couldn't get {} file", self.field_name()))
            }
            (_, ValidationError::EmptyFile) => {
                AppError::InvalidInput(format!("Empty {} file", self.field_name()))
            }
        }
    }

    /// Body-limit overruns surface as multipart errors with a 413 status.
    pub fn multipart_error(self, err: MultipartError) -> AppError {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return self.rejection(ValidationError::FileTooLarge { size: 0, max: 0 });
        }
        tracing::debug!(error = %err, upload = self.field_name(), "Malformed multipart body");
        self.rejection(ValidationError::MissingField(self.field_name().to_string()))
    }
}

/// Buffer a multipart field, failing as soon as it outgrows the validator's limit.
pub async fn read_field_limited(
    kind: UploadKind,
    mut field: Field<'_>,
    validator: &MediaValidator,
) -> Result<Vec<u8>, AppError> {
    let max = validator.max_file_size();
    let mut data = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(|e| kind.multipart_error(e))? {
        let size = data.len() + chunk.len();
        if size > max {
            return Err(kind.rejection(ValidationError::FileTooLarge { size, max }));
        }
        data.extend_from_slice(&chunk);
    }

    validator
        .validate_file_size(data.len())
        .map_err(|e| kind.rejection(e))?;
    Ok(data)
}

/// Stream a multipart field into `path`, returning the number of bytes written.
pub async fn stream_field_to_file(
    kind: UploadKind,
    mut field: Field<'_>,
    path: &Path,
    validator: &MediaValidator,
) -> Result<usize, AppError> {
    let max = validator.max_file_size();
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0usize;

    while let Some(chunk) = field.chunk().await.map_err(|e| kind.multipart_error(e))? {
        written += chunk.len();
        if written > max {
            return Err(kind.rejection(ValidationError::FileTooLarge { size: written, max }));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    validator
        .validate_file_size(written)
        .map_err(|e| kind.rejection(e))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn video_id_must_be_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_video_id(&id.to_string()).unwrap(), id);

        match parse_video_id("not-a-uuid") {
            Err(AppError::InvalidInput(msg)) => assert_eq!(msg, "Invalid video ID"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn rejections_name_the_upload() {
        let too_large = UploadKind::Video.rejection(ValidationError::FileTooLarge {
            size: 2,
            max: 1,
        });
        assert_eq!(too_large.http_status_code(), 413);
        assert_eq!(too_large.client_message(), "Video file too large");

        let wrong_type = UploadKind::Thumbnail.rejection(ValidationError::InvalidContentType {
            content_type: "image/gif".to_string(),
            allowed: vec!["image/png".to_string()],
        });
        assert_eq!(wrong_type.http_status_code(), 400);
        assert_eq!(wrong_type.client_message(), "Invalid thumbnail file type");

        let missing = UploadKind::Thumbnail
            .rejection(ValidationError::MissingField(THUMBNAIL_FIELD.to_string()));
        assert_eq!(missing.http_status_code(), 400);
        assert_eq!(missing.client_message(), "Couldn't get thumbnail file");

        let empty = UploadKind::Video.rejection(ValidationError::EmptyFile);
        assert_eq!(empty.http_status_code(), 400);
        assert_eq!(empty.client_message(), "Empty video file");
    }
}
