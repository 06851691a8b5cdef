//! Response processing: make raw provider output fit for posting.

use crate::config::ContentLimits;
use studio_domain::{ImageConstraints, ImageRejection, OutputContent, TextCleaner, validate_image};
use thiserror::Error;

/// Why a provider response could not be stored
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputRejection {
    #[error("text is empty after cleaning")]
    EmptyText,

    #[error(transparent)]
    Image(#[from] ImageRejection),
}

/// Applies the content limits to generated output
#[derive(Debug, Clone)]
pub struct ResponseProcessor {
    cleaner: TextCleaner,
    image: ImageConstraints,
}

impl Default for ResponseProcessor {
    fn default() -> Self {
        Self::new(&ContentLimits::default())
    }
}

impl ResponseProcessor {
    pub fn new(limits: &ContentLimits) -> Self {
        Self {
            cleaner: TextCleaner::new(limits.max_chars),
            image: limits.image.clone(),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.cleaner.max_chars()
    }

    pub fn clean(&self, raw: &str) -> String {
        self.cleaner.clean(raw)
    }

    pub fn exceeds_limit(&self, raw: &str) -> bool {
        self.cleaner.exceeds_limit(raw)
    }

    /// Clean text, or validate an image and pass it through unchanged
    pub fn process(&self, content: OutputContent) -> Result<OutputContent, OutputRejection> {
        match content {
            OutputContent::Text(raw) => {
                let cleaned = self.clean(&raw);
                if cleaned.is_empty() {
                    return Err(OutputRejection::EmptyText);
                }
                Ok(OutputContent::Text(cleaned))
            }
            image => Ok(validate_image(image, &self.image)?),
        }
    }
}
