//! Configuration module
//!
//! Application settings are read from the environment (with `.env` support via
//! dotenvy). `Config::from_lookup` takes any key lookup so tests can build a
//! configuration without touching process-wide environment variables.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 1;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const MAX_VIDEO_SIZE_MB: usize = 1024;
const FFPROBE_TIMEOUT_SECS: u64 = 60;

/// Where thumbnails end up once uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailStorageMode {
    /// Written to `ASSETS_ROOT` and served under `/assets`.
    Local,
    /// Embedded into the video record as a base64 `data:` URL.
    Inline,
}

impl FromStr for ThumbnailStorageMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(ThumbnailStorageMode::Local),
            "inline" => Ok(ThumbnailStorageMode::Inline),
            _ => Err(anyhow::anyhow!("Invalid thumbnail storage mode: {}", s)),
        }
    }
}

impl Display for ThumbnailStorageMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailStorageMode::Local => write!(f, "local"),
            ThumbnailStorageMode::Inline => write!(f, "inline"),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// `LOG_FORMAT=json` switches console logs to JSON lines
    pub log_json: bool,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    // Thumbnail storage
    pub assets_root: String,
    pub public_base_url: String,
    pub thumbnail_storage: ThumbnailStorageMode,
    pub max_thumbnail_size_bytes: usize,
    pub thumbnail_allowed_content_types: Vec<String>,
    // Video storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_public_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub max_video_size_bytes: usize,
    pub video_allowed_content_types: Vec<String>,
    // Media probing
    pub ffprobe_path: String,
    pub ffprobe_timeout_secs: u64,
}

/// Megabyte setting converted to bytes. Garbage and overflow are errors.
fn size_limit_bytes(
    key: &str,
    raw: Option<String>,
    default_mb: usize,
) -> Result<usize, anyhow::Error> {
    let mb = match raw {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("{} must be a whole number of megabytes", key))?,
        None => default_mb,
    };
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB overflows a byte count", key, mb))
}

fn parse_list(raw: String) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let server_port: u16 = match var("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let thumbnail_storage = match var("THUMBNAIL_STORAGE") {
            Some(raw) => raw.parse::<ThumbnailStorageMode>()?,
            None => ThumbnailStorageMode::Local,
        };

        let max_thumbnail_size_bytes = size_limit_bytes(
            "MAX_THUMBNAIL_SIZE_MB",
            var("MAX_THUMBNAIL_SIZE_MB"),
            MAX_THUMBNAIL_SIZE_MB,
        )?;
        let max_video_size_bytes = size_limit_bytes(
            "MAX_VIDEO_SIZE_MB",
            var("MAX_VIDEO_SIZE_MB"),
            MAX_VIDEO_SIZE_MB,
        )?;

        let config = Config {
            server_port,
            environment,
            log_json: var("LOG_FORMAT")
                .map(|f| f.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            cors_origins,
            database_url: var("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: var("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: var("JWT_EXPIRY_HOURS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(JWT_EXPIRY_HOURS),
            assets_root: var("ASSETS_ROOT").unwrap_or_else(|| "./assets".to_string()),
            public_base_url: var("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}", server_port)),
            thumbnail_storage,
            max_thumbnail_size_bytes,
            thumbnail_allowed_content_types: parse_list(
                var("THUMBNAIL_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| "image/jpeg,image/png".to_string()),
            ),
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            s3_public_base_url: var("S3_PUBLIC_BASE_URL").or_else(|| {
                var("S3_CF_DISTRO").map(|distro| {
                    if distro.starts_with("http://") || distro.starts_with("https://") {
                        distro
                    } else {
                        format!("https://{}", distro)
                    }
                })
            }),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            max_video_size_bytes,
            video_allowed_content_types: parse_list(
                var("VIDEO_ALLOWED_CONTENT_TYPES").unwrap_or_else(|| "video/mp4".to_string()),
            ),
            ffprobe_path: var("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            ffprobe_timeout_secs: var("FFPROBE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(FFPROBE_TIMEOUT_SECS),
        };

        Ok(config)
    }

    /// Reject settings that would only fail later at request time.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }
        if self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_THUMBNAIL_SIZE_MB must be greater than 0"));
        }
        if self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_VIDEO_SIZE_MB must be greater than 0"));
        }
        if self.thumbnail_allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_ALLOWED_CONTENT_TYPES must list at least one type"
            ));
        }
        if self.video_allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "VIDEO_ALLOWED_CONTENT_TYPES must list at least one type"
            ));
        }
        if self.storage_backend == StorageBackend::S3 {
            if self.s3_bucket.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_BUCKET must be set when STORAGE_BACKEND=s3"
                ));
            }
            if self.s3_region.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3"
                ));
            }
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Probe timeout, `None` when disabled with `FFPROBE_TIMEOUT_SECS=0`.
    pub fn ffprobe_timeout(&self) -> Option<Duration> {
        (self.ffprobe_timeout_secs > 0).then(|| Duration::from_secs(self.ffprobe_timeout_secs))
    }

    /// Base URL for thumbnails served from `ASSETS_ROOT`.
    pub fn assets_base_url(&self) -> String {
        format!("{}/assets", self.public_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgres://localhost/tubely"),
            ("JWT_SECRET", "secret"),
            ("S3_BUCKET", "tubely-videos"),
            ("S3_REGION", "us-east-2"),
        ]
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup(&minimal())).unwrap();
        assert_eq!(config.server_port, 8091);
        assert_eq!(config.storage_backend, StorageBackend::S3);
        assert_eq!(config.thumbnail_storage, ThumbnailStorageMode::Local);
        assert_eq!(config.max_thumbnail_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_video_size_bytes, 1 << 30);
        assert_eq!(config.video_allowed_content_types, vec!["video/mp4"]);
        assert_eq!(config.public_base_url, "http://localhost:8091");
        assert_eq!(config.assets_base_url(), "http://localhost:8091/assets");
        assert_eq!(config.ffprobe_timeout(), Some(Duration::from_secs(60)));
        assert!(!config.log_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_jwt_secret_is_an_error() {
        let pairs = [("DATABASE_URL", "postgres://localhost/tubely")];
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn wildcard_cors_rejected_in_production() {
        let mut pairs = minimal();
        pairs.push(("ENVIRONMENT", "production"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn s3_backend_requires_bucket() {
        let pairs = [
            ("DATABASE_URL", "postgres://localhost/tubely"),
            ("JWT_SECRET", "secret"),
            ("S3_REGION", "us-east-2"),
        ];
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn cloudfront_distribution_becomes_public_base_url() {
        let mut pairs = minimal();
        pairs.push(("S3_CF_DISTRO", "d111111abcdef8.cloudfront.net"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(
            config.s3_public_base_url.as_deref(),
            Some("https://d111111abcdef8.cloudfront.net")
        );
    }

    #[test]
    fn zero_timeout_disables_probe_timeout() {
        let mut pairs = minimal();
        pairs.push(("FFPROBE_TIMEOUT_SECS", "0"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.ffprobe_timeout(), None);
    }

    #[test]
    fn unknown_thumbnail_mode_is_rejected() {
        let mut pairs = minimal();
        pairs.push(("THUMBNAIL_STORAGE", "ftp"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn size_limits_are_read_in_megabytes() {
        let mut pairs = minimal();
        pairs.push(("MAX_THUMBNAIL_SIZE_MB", "2"));
        pairs.push(("MAX_VIDEO_SIZE_MB", "512"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.max_thumbnail_size_bytes, 2 * 1024 * 1024);
        assert_eq!(config.max_video_size_bytes, 512 * 1024 * 1024);
    }

    #[test]
    fn overflowing_size_limit_is_rejected() {
        let mut pairs = minimal();
        pairs.push(("MAX_VIDEO_SIZE_MB", "18446744073709551615"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("MAX_VIDEO_SIZE_MB"));
    }

    #[test]
    fn non_numeric_size_limit_is_rejected() {
        let mut pairs = minimal();
        pairs.push(("MAX_THUMBNAIL_SIZE_MB", "ten"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("MAX_THUMBNAIL_SIZE_MB"));
    }
}
