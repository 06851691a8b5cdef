//! Image output validation
//!
//! Image content is never modified; it is only checked against the limits
//! the provider declares.

use crate::catalog::OutputContent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image encodings recognised by magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 4] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Webp,
    ];

    /// Detect the format from the leading bytes of a payload
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "gif" => Ok(ImageFormat::Gif),
            "webp" => Ok(ImageFormat::Webp),
            other => Err(format!("unknown image format: {}", other)),
        }
    }
}

/// Limits an image payload must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConstraints {
    pub max_bytes: usize,
    pub formats: Vec<ImageFormat>,
}

impl Default for ImageConstraints {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            formats: ImageFormat::ALL.to_vec(),
        }
    }
}

/// Why an image output was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageRejection {
    #[error("expected image content, got text")]
    NotAnImage,

    #[error("image payload is empty")]
    Empty,

    #[error("image is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("unrecognised or disallowed image format{}", .0.map(|f| format!(" ({})", f)).unwrap_or_default())]
    UnsupportedFormat(Option<ImageFormat>),

    #[error("image url must be http(s): {0}")]
    InvalidUrl(String),
}

/// Check image content against `constraints`, returning it untouched on success
pub fn validate_image(
    content: OutputContent,
    constraints: &ImageConstraints,
) -> Result<OutputContent, ImageRejection> {
    match &content {
        OutputContent::Text(_) => Err(ImageRejection::NotAnImage),
        OutputContent::ImageUrl(url) => {
            let url = url.trim();
            let valid = ["https://", "http://"]
                .iter()
                .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme));
            if !valid || url.contains(char::is_whitespace) {
                return Err(ImageRejection::InvalidUrl(url.to_string()));
            }
            Ok(content)
        }
        OutputContent::ImageBytes(bytes) => {
            if bytes.is_empty() {
                return Err(ImageRejection::Empty);
            }
            if bytes.len() > constraints.max_bytes {
                return Err(ImageRejection::TooLarge {
                    size: bytes.len(),
                    max: constraints.max_bytes,
                });
            }
            match ImageFormat::sniff(bytes) {
                Some(format) if constraints.formats.contains(&format) => Ok(content),
                other => Err(ImageRejection::UnsupportedFormat(other)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png(len: usize) -> Vec<u8> {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(len.max(PNG_HEADER.len()), 0);
        bytes
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ImageFormat::sniff(&png(16)), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::sniff(b"hello"), None);
    }

    #[test]
    fn test_valid_bytes_pass_through_unchanged() {
        let content = OutputContent::ImageBytes(png(64));
        let validated = validate_image(content.clone(), &ImageConstraints::default()).unwrap();
        assert_eq!(validated, content);
    }

    #[test]
    fn test_rejects_oversized() {
        let constraints = ImageConstraints {
            max_bytes: 32,
            formats: vec![ImageFormat::Png],
        };
        let err = validate_image(OutputContent::ImageBytes(png(64)), &constraints).unwrap_err();
        assert_eq!(err, ImageRejection::TooLarge { size: 64, max: 32 });
    }

    #[test]
    fn test_rejects_disallowed_format() {
        let constraints = ImageConstraints {
            max_bytes: 1024,
            formats: vec![ImageFormat::Jpeg],
        };
        let err = validate_image(OutputContent::ImageBytes(png(64)), &constraints).unwrap_err();
        assert_eq!(err, ImageRejection::UnsupportedFormat(Some(ImageFormat::Png)));
        assert_eq!(err.to_string(), "unrecognised or disallowed image format (png)");
    }

    #[test]
    fn test_rejects_empty_and_text() {
        let constraints = ImageConstraints::default();
        assert_eq!(
            validate_image(OutputContent::ImageBytes(Vec::new()), &constraints),
            Err(ImageRejection::Empty)
        );
        assert_eq!(
            validate_image(OutputContent::Text("hi".into()), &constraints),
            Err(ImageRejection::NotAnImage)
        );
    }

    #[test]
    fn test_url_scheme() {
        let constraints = ImageConstraints::default();
        assert!(
            validate_image(
                OutputContent::ImageUrl("https://cdn.example.com/a.png".into()),
                &constraints
            )
            .is_ok()
        );
        assert!(matches!(
            validate_image(OutputContent::ImageUrl("ftp://x/a.png".into()), &constraints),
            Err(ImageRejection::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_image(OutputContent::ImageUrl("https://".into()), &constraints),
            Err(ImageRejection::InvalidUrl(_))
        ));
    }
}
