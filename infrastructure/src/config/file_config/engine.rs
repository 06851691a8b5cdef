//! Engine tuning from TOML (`[selection]`, `[generation]`, `[content]`,
//! `[rewrite]` sections)

use serde::{Deserialize, Serialize};
use studio_domain::{DEFAULT_TEMPERATURE, ImageConstraints, ImageFormat, POST_CHAR_LIMIT};

/// Raw selection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSelectionConfig {
    /// Softmax temperature for weighted mode
    pub temperature: f64,
    /// Mode used when a request does not name one
    pub default_mode: String,
}

impl Default for FileSelectionConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            default_mode: "random".to_string(),
        }
    }
}

/// Raw retry and abbreviation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Per-attempt timeout
    pub call_timeout_secs: u64,
    /// Budget for one generation including retries
    pub deadline_secs: u64,
    pub max_abbreviations: u32,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            call_timeout_secs: 60,
            deadline_secs: 120,
            max_abbreviations: 1,
        }
    }
}

/// Raw content limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContentConfig {
    pub max_chars: usize,
    pub image_max_bytes: usize,
    /// Accepted image formats (png, jpeg, gif, webp)
    pub image_formats: Vec<String>,
}

impl Default for FileContentConfig {
    fn default() -> Self {
        let image = ImageConstraints::default();
        Self {
            max_chars: POST_CHAR_LIMIT,
            image_max_bytes: image.max_bytes,
            image_formats: image.formats.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl FileContentConfig {
    /// Parse `image_formats`, returning the recognised formats and the
    /// entries that were not understood.
    pub fn parse_image_formats(&self) -> (Vec<ImageFormat>, Vec<String>) {
        let mut formats = Vec::new();
        let mut unknown = Vec::new();
        for raw in &self.image_formats {
            match raw.parse::<ImageFormat>() {
                Ok(format) if !formats.contains(&format) => formats.push(format),
                Ok(_) => {}
                Err(_) => unknown.push(raw.clone()),
            }
        }
        (formats, unknown)
    }
}

/// Raw prompt rewrite configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRewriteConfig {
    /// Text model that performs rewrites (defaults to the first text model)
    pub model: Option<String>,
    /// Past outputs shown to the rewriting model
    pub sample_size: usize,
}

impl Default for FileRewriteConfig {
    fn default() -> Self {
        Self {
            model: None,
            sample_size: 6,
        }
    }
}
