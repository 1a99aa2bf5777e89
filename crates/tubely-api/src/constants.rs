/// Multipart field carrying thumbnail image bytes
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying video bytes
pub const VIDEO_FIELD: &str = "video";

/// Extension given to stored videos; only MP4 uploads are accepted by default
pub const VIDEO_EXTENSION: &str = "mp4";

/// Slack on top of a file size limit for multipart boundaries and headers
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
