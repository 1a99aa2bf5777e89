use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Encode bytes as an RFC 2397 `data:` URL so small assets can live inside a record.
pub fn encode_data_url(content_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_media_type_and_payload() {
        assert_eq!(
            encode_data_url("image/png", b"\x89PNG"),
            "data:image/png;base64,iVBORw=="
        );
    }

    #[test]
    fn empty_payload() {
        assert_eq!(encode_data_url("image/jpeg", b""), "data:image/jpeg;base64,");
    }
}
