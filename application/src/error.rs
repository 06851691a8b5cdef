//! Engine error taxonomy
//!
//! Every failure surfaced by the engine maps to one [`ErrorKind`]. Callers
//! branch on the kind; the variants carry the detail for logs and messages.

use crate::ports::generation_gateway::ProviderError;
use crate::ports::suggestion_store::StoreError;
use std::fmt;
use std::time::Duration;
use studio_domain::DomainError;
use thiserror::Error;

/// Coarse classification callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input or an empty candidate set; retrying will not help
    Validation,
    /// Provider did not answer in time or kept failing; may succeed later
    TransientProvider,
    /// Provider refused the request or returned something unusable
    PermanentProvider,
    /// The store failed to read or write
    Persistence,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::TransientProvider => "transient provider",
            ErrorKind::PermanentProvider => "permanent provider",
            ErrorKind::Persistence => "persistence",
        };
        write!(f, "{}", label)
    }
}

/// Failures of a (possibly retried) provider call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{provider} still failing after {attempts} attempt(s): {last}")]
    Exhausted {
        provider: String,
        attempts: u32,
        last: ProviderError,
    },

    #[error("{provider} did not finish within {deadline:?} ({attempts} attempt(s))")]
    DeadlineExceeded {
        provider: String,
        attempts: u32,
        deadline: Duration,
    },

    #[error("Generation with {provider} cancelled after {attempts} attempt(s)")]
    Cancelled { provider: String, attempts: u32 },

    #[error("{provider} rejected the request on attempt {attempts}: {source}")]
    Rejected {
        provider: String,
        attempts: u32,
        source: ProviderError,
    },

    #[error("{provider} returned unusable output: {reason}")]
    InvalidOutput { provider: String, reason: String },
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Exhausted { .. }
            | GenerationError::DeadlineExceeded { .. }
            | GenerationError::Cancelled { .. } => ErrorKind::TransientProvider,
            GenerationError::Rejected { .. } | GenerationError::InvalidOutput { .. } => {
                ErrorKind::PermanentProvider
            }
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            GenerationError::Exhausted { provider, .. }
            | GenerationError::DeadlineExceeded { provider, .. }
            | GenerationError::Cancelled { provider, .. }
            | GenerationError::Rejected { provider, .. }
            | GenerationError::InvalidOutput { provider, .. } => provider,
        }
    }

    /// Number of provider calls made; 0 when the output was refused afterwards
    pub fn attempts(&self) -> u32 {
        match self {
            GenerationError::Exhausted { attempts, .. }
            | GenerationError::DeadlineExceeded { attempts, .. }
            | GenerationError::Cancelled { attempts, .. }
            | GenerationError::Rejected { attempts, .. } => *attempts,
            GenerationError::InvalidOutput { .. } => 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerationError::Cancelled { .. })
    }
}

/// Top-level error of every engine operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Persistence error: {0}")]
    Persistence(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Rejected(domain) => EngineError::Validation(domain),
            other => EngineError::Persistence(other),
        }
    }
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation(_) => ErrorKind::Validation,
            EngineError::Generation(e) => e.kind(),
            EngineError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Whether repeating the same request later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::TransientProvider | ErrorKind::Persistence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_domain::{OutputType, PromptId};

    #[test]
    fn test_kinds() {
        let empty: EngineError = DomainError::NoCandidates {
            output_type: OutputType::Image,
            domain_id: None,
            candidate_count: 0,
        }
        .into();
        assert_eq!(empty.kind(), ErrorKind::Validation);

        let exhausted: EngineError = GenerationError::Exhausted {
            provider: "openrouter".into(),
            attempts: 3,
            last: ProviderError::ServerError("503".into()),
        }
        .into();
        assert_eq!(exhausted.kind(), ErrorKind::TransientProvider);
        assert!(exhausted.is_retryable());

        let rejected: EngineError = GenerationError::Rejected {
            provider: "openrouter".into(),
            attempts: 1,
            source: ProviderError::ContentPolicy("flagged".into()),
        }
        .into();
        assert_eq!(rejected.kind(), ErrorKind::PermanentProvider);
        assert!(!rejected.is_retryable());

        let missing: EngineError = StoreError::not_found("prompt", 9).into();
        assert_eq!(missing.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_store_rejection_is_validation() {
        let error: EngineError = StoreError::Rejected(DomainError::DefaultDomainProtected).into();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.to_string(), "The default domain cannot be deleted");
    }

    #[test]
    fn test_messages_carry_context() {
        let error = GenerationError::Exhausted {
            provider: "openrouter".into(),
            attempts: 3,
            last: ProviderError::Timeout,
        };
        assert_eq!(error.to_string(), "openrouter still failing after 3 attempt(s): Timeout");
        assert_eq!(error.attempts(), 3);
        assert_eq!(error.provider(), "openrouter");

        let missing = StoreError::not_found("prompt", PromptId(4).get());
        assert_eq!(missing.to_string(), "prompt 4 not found");
    }
}
