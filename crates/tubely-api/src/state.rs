use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{MediaProber, MediaValidator};
use tubely_storage::Storage;

/// Where thumbnail bytes end up.
#[derive(Clone)]
pub enum ThumbnailStore {
    /// Written under `ASSETS_ROOT` and served from `/assets`
    Local(Arc<dyn Storage>),
    /// Embedded in the record as a base64 data URL
    Inline,
}

impl ThumbnailStore {
    pub fn as_local(&self) -> Option<&Arc<dyn Storage>> {
        match self {
            ThumbnailStore::Local(storage) => Some(storage),
            ThumbnailStore::Inline => None,
        }
    }
}

pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub video_storage: Arc<dyn Storage>,
    pub thumbnails: ThumbnailStore,
    pub prober: Arc<dyn MediaProber>,
    pub thumbnail_validator: MediaValidator,
    pub video_validator: MediaValidator,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoRepository>,
        video_storage: Arc<dyn Storage>,
        thumbnails: ThumbnailStore,
        prober: Arc<dyn MediaProber>,
    ) -> Self {
        let thumbnail_validator = MediaValidator::new(
            config.max_thumbnail_size_bytes,
            config.thumbnail_allowed_content_types.clone(),
        );
        let video_validator = MediaValidator::new(
            config.max_video_size_bytes,
            config.video_allowed_content_types.clone(),
        );

        Self {
            config,
            videos,
            video_storage,
            thumbnails,
            prober,
            thumbnail_validator,
            video_validator,
        }
    }
}
