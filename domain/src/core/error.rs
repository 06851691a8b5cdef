//! Domain error types

use crate::catalog::{DomainId, OutputType};
use thiserror::Error;

/// Domain-level validation errors
///
/// Everything in here is a caller mistake or an empty catalog; none of these
/// are worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No eligible {output_type} candidates{} ({candidate_count} considered)", scope_suffix(.domain_id))]
    NoCandidates {
        output_type: OutputType,
        domain_id: Option<DomainId>,
        candidate_count: usize,
    },

    #[error("Invalid selection mode: {0} (expected random, weighted or highest)")]
    InvalidMode(String),

    #[error("Invalid output type: {0} (expected text or image)")]
    InvalidOutputType(String),

    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("Invalid feedback score: {0} (expected +1 or -1)")]
    InvalidScore(String),

    #[error("Prompt template is missing the {{context}} placeholder")]
    MissingPlaceholder,

    #[error("Model {model} cannot produce {output_type} output")]
    TypeMismatch {
        model: String,
        output_type: OutputType,
    },

    #[error("The default domain cannot be deleted")]
    DefaultDomainProtected,

    #[error("Model {0} has no capabilities (needs text, image or both)")]
    NoCapabilities(String),

    #[error("Softmax temperature must be a positive finite number, got {0}")]
    InvalidTemperature(String),
}

fn scope_suffix(domain_id: &Option<DomainId>) -> String {
    match domain_id {
        Some(id) => format!(" in domain {}", id),
        None => String::new(),
    }
}

impl DomainError {
    /// Check if this error came from an empty candidate pool
    pub fn is_no_candidates(&self) -> bool {
        matches!(self, DomainError::NoCandidates { .. })
    }
}
