use base64::{engine::general_purpose::STANDARD, Engine as _};

const JPEG_PREFIX: &str = "data:image/jpeg;base64,";

/// Inline form of an encoded JPEG, stored with the completion.
pub fn to_data_url(jpeg: &[u8]) -> String {
    format!("{}{}", JPEG_PREFIX, STANDARD.encode(jpeg))
}

pub fn is_data_url(value: &str) -> bool {
    value.starts_with("data:")
}

/// Payload bytes of a base64 data URL, `None` for anything else.
pub fn decode_data_url(value: &str) -> Option<Vec<u8>> {
    let (header, payload) = value.strip_prefix("data:")?.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_bytes_to_data_url() {
        assert_eq!(to_data_url(&[0xFF, 0xD8, 0xFF]), "data:image/jpeg;base64,/9j/");
        assert!(is_data_url(&to_data_url(b"x")));
        assert!(!is_data_url("https://cdn.example.com/photo.jpg"));
    }

    #[test]
    fn decode_reads_any_base64_data_url() {
        assert_eq!(decode_data_url("data:image/png;base64,aGk="), Some(b"hi".to_vec()));
        assert_eq!(decode_data_url(&to_data_url(b"jpeg")), Some(b"jpeg".to_vec()));
        assert_eq!(decode_data_url("data:text/plain,hi"), None);
        assert_eq!(decode_data_url("https://example.com"), None);
    }
}
