//! Application layer for x-studio
//!
//! This crate contains the use cases, the ports they depend on, and the
//! engine configuration. It depends only on the domain layer.

pub mod config;
pub mod engine;
pub mod error;
pub mod ports;
pub mod services;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{ContentLimits, EngineConfig, RetryPolicy, RewriteParams, SelectionParams};
pub use engine::SuggestionEngine;
pub use error::{EngineError, ErrorKind, GenerationError};
pub use ports::{
    event_logger::{EngineEvent, EventLogger, NoEventLogger},
    generation_gateway::{FailureClass, GenerationGateway, ProviderError},
    suggestion_store::{StoreError, SuggestionStore},
};
pub use services::{FeedbackAggregator, GenerationInvoker, ResponseProcessor};
pub use use_cases::get_suggestion::{GetSuggestionInput, GetSuggestionUseCase, Suggestion};
pub use use_cases::manage_catalog::{ManageCatalogUseCase, PairHistory};
pub use use_cases::rewrite_prompt::{RewriteOutcome, RewritePromptUseCase};
pub use use_cases::submit_feedback::SubmitFeedbackUseCase;
