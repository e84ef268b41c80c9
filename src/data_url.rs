//! `data:` URL helpers for embedded images.
//!
//! Saved records and logo overlays carry their pixels inline as
//! `data:<mime>;base64,<payload>` so a record is self-contained.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

/// Encode bytes as a base64 `data:` URL.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Split a base64 `data:` URL into its mime type and decoded payload.
///
/// Returns `None` for anything that is not a base64 data URL.
pub fn decode(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = BASE64.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode() {
        let url = encode("image/png", b"\x89PNG");
        assert_eq!(url, "data:image/png;base64,iVBORw==");
        let (mime, bytes) = decode(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"\x89PNG");
    }

    #[test]
    fn decode_rejects_non_base64_urls() {
        assert_eq!(decode("https://example.com/logo.png"), None);
        assert_eq!(decode("data:image/svg+xml,<svg/>"), None);
        assert_eq!(decode("data:image/png;base64,@@@"), None);
    }
}
