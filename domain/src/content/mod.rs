//! Post-processing of provider output.
//!
//! - [`cleaner::TextCleaner`]: normalizes and length-bounds text
//! - [`image::validate_image`]: checks image payloads against provider limits

pub mod cleaner;
pub mod image;

pub use cleaner::{POST_CHAR_LIMIT, TextCleaner, clean};
pub use image::{ImageConstraints, ImageFormat, ImageRejection, validate_image};
