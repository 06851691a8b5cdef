//! Generation gateway port
//!
//! Defines the interface for calling text and image generation providers.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use studio_domain::{AiModel, OutputContent};
use thiserror::Error;

/// Whether retrying the same call could plausibly succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Transient,
    Permanent,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureClass::Transient => write!(f, "transient"),
            FailureClass::Permanent => write!(f, "permanent"),
        }
    }
}

/// Errors a provider call can end with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Timeout")]
    Timeout,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Content policy rejection: {0}")]
    ContentPolicy(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    pub fn class(&self) -> FailureClass {
        match self {
            ProviderError::Timeout
            | ProviderError::ConnectionError(_)
            | ProviderError::RateLimited(_)
            | ProviderError::ServerError(_) => FailureClass::Transient,
            ProviderError::InvalidCredentials(_)
            | ProviderError::ModelNotAvailable(_)
            | ProviderError::ContentPolicy(_)
            | ProviderError::MalformedRequest(_)
            | ProviderError::MalformedResponse(_) => FailureClass::Permanent,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.class() == FailureClass::Transient
    }
}

/// Gateway to generation providers
///
/// One call, one attempt: retries, backoff and deadlines are handled by
/// [`GenerationInvoker`](crate::services::generation_invoker::GenerationInvoker).
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Provider name used in errors and logs
    fn name(&self) -> &str;

    /// Generate text for an already-rendered prompt
    async fn generate_text(
        &self,
        model: &AiModel,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, ProviderError>;

    /// Generate one image; the result is an image URL or raw bytes
    async fn generate_image(
        &self,
        model: &AiModel,
        prompt: &str,
        timeout: Duration,
    ) -> Result<OutputContent, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_classes() {
        assert!(ProviderError::Timeout.is_transient());
        assert!(ProviderError::RateLimited("429".into()).is_transient());
        assert!(ProviderError::ServerError("503".into()).is_transient());
        assert!(ProviderError::ConnectionError("reset".into()).is_transient());
        assert!(!ProviderError::InvalidCredentials("401".into()).is_transient());
        assert!(!ProviderError::ContentPolicy("blocked".into()).is_transient());
        assert_eq!(
            ProviderError::MalformedRequest("400".into()).class(),
            FailureClass::Permanent
        );
    }
}
