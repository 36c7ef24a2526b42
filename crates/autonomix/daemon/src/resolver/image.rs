//! Image data URIs

use base64::{engine::general_purpose::STANDARD, Engine as _};

const PLACEHOLDER_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64">"#,
    r##"<rect width="100%" height="100%" fill="#1f2937"/>"##,
    r##"<text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" fill="#9ca3af" font-size="10">Agent</text>"##,
    "</svg>"
);

/// MIME type from a path or URL extension
pub fn infer_mime(reference: &str) -> &'static str {
    let lower = reference.to_ascii_lowercase();
    let lower = lower.split(['?', '#']).next().unwrap_or_default();

    if lower.ends_with(".svg") {
        "image/svg+xml"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Data URI shown when an agent's image cannot be loaded
pub fn placeholder_data_uri() -> String {
    to_data_uri(PLACEHOLDER_SVG.as_bytes(), "image/svg+xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_mime() {
        assert_eq!(infer_mime("ipfs://Qm/logo.PNG"), "image/png");
        assert_eq!(infer_mime("https://x/a.jpeg?v=2"), "image/jpeg");
        assert_eq!(infer_mime("/images/a.svg"), "image/svg+xml");
        assert_eq!(infer_mime("/images/a"), "application/octet-stream");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(to_data_uri(b"hi", "text/plain"), "data:text/plain;base64,aGk=");
        assert!(placeholder_data_uri().starts_with("data:image/svg+xml;base64,"));
    }
}
