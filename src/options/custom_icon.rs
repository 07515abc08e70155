//! Custom icon import: type sniffing and data-URI encoding

use super::OptionsError;
use crate::models::IconRef;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const ACCEPTED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/x-icon",
    "image/vnd.microsoft.icon",
    "image/svg+xml",
];

/// MIME type of `bytes`, if it looks like an image
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    // infer reports SVG documents as plain XML
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        return Some("image/svg+xml");
    }

    infer::get(bytes).map(|kind| kind.mime_type())
}

/// Validate `bytes` and wrap them as a `data:` URI
pub fn encode_custom_icon(bytes: &[u8], max_bytes: usize) -> Result<IconRef, OptionsError> {
    if bytes.is_empty() {
        return Err(OptionsError::EmptyIcon);
    }
    if bytes.len() > max_bytes {
        return Err(OptionsError::IconTooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    let mime = sniff_image_type(bytes)
        .ok_or_else(|| OptionsError::UnsupportedIconType("unknown".to_string()))?;
    if !ACCEPTED_MIME_TYPES.contains(&mime) {
        return Err(OptionsError::UnsupportedIconType(mime.to_string()));
    }

    Ok(IconRef::Embedded(format!("data:{};base64,{}", mime, STANDARD.encode(bytes))))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn test_png_is_encoded() {
        let icon = encode_custom_icon(PNG_HEADER, 1024).unwrap();
        assert!(icon.as_str().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_svg_is_detected() {
        let svg = br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"></svg>"#;
        assert_eq!(sniff_image_type(svg), Some("image/svg+xml"));
    }

    #[test]
    fn test_too_large_is_rejected() {
        let err = encode_custom_icon(PNG_HEADER, 4).unwrap_err();
        assert!(matches!(err, OptionsError::IconTooLarge { size: 12, max: 4 }));
    }

    #[test]
    fn test_non_image_is_rejected() {
        let err = encode_custom_icon(b"just some text", 1024).unwrap_err();
        assert!(matches!(err, OptionsError::UnsupportedIconType(_)));

        // a PDF is recognised but not accepted
        let err = encode_custom_icon(b"%PDF-1.7 rest", 1024).unwrap_err();
        assert!(matches!(err, OptionsError::UnsupportedIconType(ref mime) if mime == "application/pdf"));
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(matches!(encode_custom_icon(&[], 1024), Err(OptionsError::EmptyIcon)));
    }
}
