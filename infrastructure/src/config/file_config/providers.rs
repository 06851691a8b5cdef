//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Raw configuration for the OpenAI-compatible generation provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Base URL for `/chat/completions` (OpenRouter by default)
    pub text_base_url: String,
    /// Base URL for `/images/generations`
    pub image_base_url: String,
    /// Environment variable holding the text API key
    pub api_key_env: String,
    /// Environment variable holding the image API key
    pub image_api_key_env: String,
    /// Max tokens per text response
    pub max_tokens: u32,
    /// Requested image dimensions, e.g. "1024x1024"
    pub image_size: String,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            text_base_url: "https://openrouter.ai/api/v1".to_string(),
            image_base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            image_api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 200,
            image_size: "1024x1024".to_string(),
        }
    }
}

impl FileProvidersConfig {
    /// Read the text API key from the configured environment variable
    pub fn text_api_key(&self) -> Option<String> {
        read_key(&self.api_key_env)
    }

    /// Read the image API key from the configured environment variable
    pub fn image_api_key(&self) -> Option<String> {
        read_key(&self.image_api_key_env)
    }
}

fn read_key(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
