//! Generation invoker
//!
//! Wraps a [`GenerationGateway`] with the retry policy: per-attempt timeout,
//! exponential backoff with jitter on transient failures, an overall
//! deadline and cooperative cancellation.

use crate::config::RetryPolicy;
use crate::error::GenerationError;
use crate::ports::generation_gateway::{GenerationGateway, ProviderError};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use studio_domain::{AiModel, OutputContent, OutputType, PromptTemplate};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Successful provider output together with how many calls it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub content: OutputContent,
    pub attempts: u32,
}

/// Calls a provider under a [`RetryPolicy`]
pub struct GenerationInvoker {
    gateway: Arc<dyn GenerationGateway>,
    policy: RetryPolicy,
}

impl GenerationInvoker {
    pub fn new(gateway: Arc<dyn GenerationGateway>, policy: RetryPolicy) -> Self {
        Self { gateway, policy }
    }

    pub fn provider(&self) -> &str {
        self.gateway.name()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Render `template` with `context` and generate from it
    pub async fn generate(
        &self,
        model: &AiModel,
        template: &PromptTemplate,
        context: Option<&str>,
        output_type: OutputType,
        cancel: &CancellationToken,
    ) -> Result<Generated, GenerationError> {
        let prompt = template.render(context);
        self.generate_raw(model, &prompt, output_type, cancel).await
    }

    /// Generate from an already-final prompt (meta-prompts, abbreviation)
    pub async fn generate_raw(
        &self,
        model: &AiModel,
        prompt: &str,
        output_type: OutputType,
        cancel: &CancellationToken,
    ) -> Result<Generated, GenerationError> {
        let provider = self.gateway.name().to_string();
        let deadline = Instant::now() + self.policy.deadline;
        let mut attempts: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled { provider, attempts });
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.deadline_exceeded(provider, attempts));
            }

            attempts += 1;
            let timeout = self.policy.call_timeout.min(remaining);
            debug!(
                "Calling {} with {} for {} (attempt {}/{})",
                provider, model.name, output_type, attempts, self.policy.max_attempts
            );

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(GenerationError::Cancelled { provider, attempts });
                }
                result = tokio::time::timeout(timeout, self.call(model, prompt, output_type, timeout)) => {
                    result.unwrap_or(Err(ProviderError::Timeout))
                }
            };

            let error = match outcome {
                Ok(content) => return Ok(Generated { content, attempts }),
                Err(error) => error,
            };

            if !error.is_transient() {
                warn!("{} rejected {} request: {}", provider, model.name, error);
                return Err(GenerationError::Rejected {
                    provider,
                    attempts,
                    source: error,
                });
            }
            if Instant::now() >= deadline {
                return Err(self.deadline_exceeded(provider, attempts));
            }
            if attempts >= self.policy.max_attempts {
                warn!("{} still failing after {} attempt(s): {}", provider, attempts, error);
                return Err(GenerationError::Exhausted {
                    provider,
                    attempts,
                    last: error,
                });
            }

            let delay = jittered(self.policy.backoff_for(attempts));
            if Instant::now() + delay >= deadline {
                return Err(self.deadline_exceeded(provider, attempts));
            }
            warn!(
                "{} attempt {} failed ({}), retrying in {:?}",
                provider, attempts, error, delay
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(GenerationError::Cancelled { provider, attempts });
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn call(
        &self,
        model: &AiModel,
        prompt: &str,
        output_type: OutputType,
        timeout: Duration,
    ) -> Result<OutputContent, ProviderError> {
        match output_type {
            OutputType::Text => self
                .gateway
                .generate_text(model, prompt, timeout)
                .await
                .map(OutputContent::Text),
            OutputType::Image => self.gateway.generate_image(model, prompt, timeout).await,
        }
    }

    fn deadline_exceeded(&self, provider: String, attempts: u32) -> GenerationError {
        warn!(
            "{} did not finish within {:?} ({} attempt(s))",
            provider, self.policy.deadline, attempts
        );
        GenerationError::DeadlineExceeded {
            provider,
            attempts,
            deadline: self.policy.deadline,
        }
    }
}

/// Equal jitter: somewhere between half the delay and the full delay
fn jittered(base: Duration) -> Duration {
    let half = base / 2;
    let spread = u64::try_from(half.as_millis()).unwrap_or(u64::MAX);
    if spread == 0 {
        return base;
    }
    half + Duration::from_millis(rand::thread_rng().gen_range(0..=spread))
}
