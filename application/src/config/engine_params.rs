//! Engine parameters: retry policy, content limits and rewrite settings.
//!
//! These are application-layer concerns. The infrastructure layer builds an
//! [`EngineConfig`] from the merged configuration file.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use studio_domain::{DEFAULT_TEMPERATURE, ImageConstraints, POST_CHAR_LIMIT};

/// Selection tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionParams {
    /// Softmax temperature for weighted mode
    pub temperature: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// How provider calls are retried.
///
/// Attempt `n` (1-based) that fails transiently is followed by a delay of
/// `initial_backoff * 2^(n-1)`, capped at `max_backoff`, with jitter. The
/// whole call, retries included, must finish within `deadline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Per-attempt timeout
    pub call_timeout: Duration,
    /// Overall budget across attempts
    pub deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            call_timeout: Duration::from_secs(60),
            deadline: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max.max(initial);
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Un-jittered delay after the `attempt`-th failure
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

/// Limits applied to generated content before it is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLimits {
    /// Maximum post length in characters
    pub max_chars: usize,
    /// Abbreviation rounds attempted before falling back to truncation
    pub max_abbreviations: u32,
    pub image: ImageConstraints,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            max_chars: POST_CHAR_LIMIT,
            max_abbreviations: 1,
            image: ImageConstraints::default(),
        }
    }
}

/// Prompt rewrite settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteParams {
    /// Name of the text model that performs rewrites. `None` uses the
    /// first text-capable model in the catalog.
    pub model: Option<String>,
    /// How many past outputs are shown to the rewriting model
    pub sample_size: usize,
}

impl Default for RewriteParams {
    fn default() -> Self {
        Self {
            model: None,
            sample_size: 6,
        }
    }
}

/// Everything the engine is configured with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub selection: SelectionParams,
    pub retry: RetryPolicy,
    pub content: ContentLimits,
    pub rewrite: RewriteParams,
}
