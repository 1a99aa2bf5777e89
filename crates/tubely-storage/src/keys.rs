//! Storage key generation and validation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::traits::{StorageError, StorageResult};

const RANDOM_NAME_BYTES: usize = 32;

/// 32 random bytes, URL-safe base64 without padding (43 characters).
pub fn random_name() -> String {
    let bytes: [u8; RANDOM_NAME_BYTES] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// `{random}.{extension}`
pub fn random_file_name(extension: &str) -> String {
    format!("{}.{}", random_name(), extension)
}

/// `{prefix}/{random}.{extension}`
pub fn prefixed_key(prefix: &str, extension: &str) -> String {
    format!("{}/{}", prefix.trim_matches('/'), random_file_name(extension))
}

/// File extension for a MIME type, taken from its subtype (`image/png` -> `png`).
pub fn extension_for_content_type(content_type: &str) -> Option<&str> {
    let essence = content_type.split(';').next()?.trim();
    let (_, subtype) = essence.split_once('/')?;
    (!subtype.is_empty()).then_some(subtype)
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_names_are_url_safe_and_unique() {
        let a = random_name();
        let b = random_name();
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn prefixed_key_layout() {
        let key = prefixed_key("landscape", "mp4");
        let (prefix, file) = key.split_once('/').unwrap();
        assert_eq!(prefix, "landscape");
        assert!(file.ends_with(".mp4"));
        assert_eq!(file.len(), 43 + 4);
        assert!(validate_key(&key).is_ok());
    }

    #[test]
    fn extension_comes_from_subtype() {
        assert_eq!(extension_for_content_type("image/png"), Some("png"));
        assert_eq!(extension_for_content_type("image/jpeg"), Some("jpeg"));
        assert_eq!(extension_for_content_type("video/mp4; codecs=avc1"), Some("mp4"));
        assert_eq!(extension_for_content_type("image"), None);
        assert_eq!(extension_for_content_type("image/"), None);
    }

    #[test]
    fn traversal_keys_are_rejected() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/abs/path").is_err());
        assert!(validate_key("a/../../b").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("portrait/abc.mp4").is_ok());
    }
}
