//! OpenAI-compatible HTTP generation provider.
//!
//! Text goes through `/chat/completions` (OpenRouter by default), images
//! through `/images/generations`. Every failure is normalized to a
//! [`ProviderError`] so the retry loop only ever sees transient or
//! permanent outcomes.

use crate::config::FileProvidersConfig;
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use studio_application::{GenerationGateway, ProviderError};
use studio_domain::core::string::truncate;
use studio_domain::{AiModel, OutputContent};
use tracing::{debug, trace};

/// Routing prefix used in catalog names; the upstream API does not know it
const ROUTING_PREFIX: &str = "openrouter/";

/// Longest slice of an error body quoted in a [`ProviderError`]
const ERROR_BODY_PREVIEW: usize = 200;

/// One HTTP endpoint and the key that authorizes it
#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    api_key: Option<String>,
}

impl Endpoint {
    fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.api_key.as_deref().ok_or_else(|| {
            ProviderError::InvalidCredentials(format!("no API key configured for {}", self.base_url))
        })
    }
}

/// Generation gateway for OpenAI-compatible APIs
#[derive(Clone)]
pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    text: Endpoint,
    image: Endpoint,
    max_tokens: u32,
    image_size: String,
}

impl OpenAiCompatibleGateway {
    pub fn new(
        text_base_url: impl Into<String>,
        text_api_key: Option<String>,
        image_base_url: impl Into<String>,
        image_api_key: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            text: Endpoint::new(text_base_url, text_api_key),
            image: Endpoint::new(image_base_url, image_api_key),
            max_tokens: 200,
            image_size: "1024x1024".to_string(),
        }
    }

    /// Build from the `[providers]` section, reading keys from the
    /// environment variables it names.
    pub fn from_config(config: &FileProvidersConfig) -> Self {
        Self::new(
            &config.text_base_url,
            config.text_api_key(),
            &config.image_base_url,
            config.image_api_key(),
        )
        .with_max_tokens(config.max_tokens)
        .with_image_size(&config.image_size)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = size.into();
        self
    }

    pub fn has_text_key(&self) -> bool {
        self.text.api_key.is_some()
    }

    pub fn has_image_key(&self) -> bool {
        self.image.api_key.is_some()
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<R, ProviderError> {
        let url = endpoint.url(path);
        trace!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(endpoint.key()?)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &text));
        }

        let text = response.text().await.map_err(|e| classify_transport(&e))?;
        serde_json::from_str(&text).map_err(|e| {
            ProviderError::MalformedResponse(format!("unexpected response body: {}", e))
        })
    }
}

#[async_trait]
impl GenerationGateway for OpenAiCompatibleGateway {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn generate_text(
        &self,
        model: &AiModel,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: api_model_name(&model.name),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let response: ChatResponse = self
            .post(&self.text, "chat/completions", &request, timeout)
            .await?;
        let text = response.into_text()?;

        debug!("{} returned {} chars", model.name, text.chars().count());
        Ok(text)
    }

    async fn generate_image(
        &self,
        model: &AiModel,
        prompt: &str,
        timeout: Duration,
    ) -> Result<OutputContent, ProviderError> {
        let request = ImageRequest {
            model: api_model_name(&model.name),
            prompt,
            n: 1,
            size: &self.image_size,
        };

        let response: ImageResponse = self
            .post(&self.image, "images/generations", &request, timeout)
            .await?;
        let content = response.into_content()?;

        debug!("{} returned {}", model.name, content.describe());
        Ok(content)
    }
}

/// Strip the catalog routing prefix from a model name
pub fn api_model_name(name: &str) -> &str {
    name.strip_prefix(ROUTING_PREFIX).unwrap_or(name)
}

/// Map a non-success HTTP status to a tagged provider error.
///
/// 408, 429 and 5xx are transient; other 4xx are permanent.
pub fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    let detail = format!("HTTP {}: {}", status.as_u16(), truncate(body.trim(), ERROR_BODY_PREVIEW));

    match status.as_u16() {
        408 => ProviderError::Timeout,
        429 => ProviderError::RateLimited(detail),
        500..=599 => ProviderError::ServerError(detail),
        401 | 403 => ProviderError::InvalidCredentials(detail),
        404 => ProviderError::ModelNotAvailable(detail),
        _ if mentions_content_policy(body) => ProviderError::ContentPolicy(detail),
        _ => ProviderError::MalformedRequest(detail),
    }
}

fn mentions_content_policy(body: &str) -> bool {
    let body = body.to_lowercase();
    body.contains("content_policy") || body.contains("content policy") || body.contains("safety system")
}

/// Map a transport-level failure (no HTTP status) to a provider error
fn classify_transport(error: &reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else if error.is_decode() {
        ProviderError::MalformedResponse(error.to_string())
    } else if error.is_builder() {
        ProviderError::MalformedRequest(error.to_string())
    } else {
        ProviderError::ConnectionError(error.to_string())
    }
}

// ==================== Wire Types ====================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Some OpenAI-compatible routers answer 200 with an `error` object
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, ProviderError> {
        if let Some(error) = self.error {
            return Err(embedded_error(error));
        }
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("no message content in response".into()))
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

impl ImageResponse {
    fn into_content(self) -> Result<OutputContent, ProviderError> {
        if let Some(error) = self.error {
            return Err(embedded_error(error));
        }
        let Some(datum) = self.data.into_iter().next() else {
            return Err(ProviderError::MalformedResponse("no image in response".into()));
        };

        if let Some(encoded) = datum.b64_json {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| ProviderError::MalformedResponse(format!("invalid base64 image: {}", e)))?;
            return Ok(OutputContent::ImageBytes(bytes));
        }
        match datum.url {
            Some(url) => Ok(OutputContent::ImageUrl(url)),
            None => Err(ProviderError::MalformedResponse(
                "image entry has neither url nor b64_json".into(),
            )),
        }
    }
}

fn embedded_error(error: ApiErrorBody) -> ProviderError {
    let status = error
        .code
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
        .and_then(|code| StatusCode::from_u16(code).ok());

    match status {
        Some(status) if !status.is_success() => classify_status(status, &error.message),
        _ if mentions_content_policy(&error.message) => {
            ProviderError::ContentPolicy(truncate(&error.message, ERROR_BODY_PREVIEW))
        }
        _ => ProviderError::MalformedResponse(truncate(&error.message, ERROR_BODY_PREVIEW)),
    }
}
