//! Domain layer for x-studio
//!
//! This crate contains the catalog entities and the pure decision logic of
//! the suggestion engine. It performs no I/O; randomness is injected.
//!
//! # Core Concepts
//!
//! ## Candidates
//!
//! A candidate is a (model, prompt) pair whose model can produce the
//! prompt's output type. Its score is the sum of the +1/-1 votes its past
//! outputs received; pairs without votes score 0 and stay eligible.
//!
//! ## Selection
//!
//! - **random**: uniform draw
//! - **weighted**: softmax over scores
//! - **highest**: argmax with a fixed tie-break
//!
//! ## Content
//!
//! Generated text is cleaned into a postable form of at most 280 characters;
//! images are validated and passed through untouched.

pub mod catalog;
pub mod content;
pub mod core;
pub mod prompt;
pub mod selection;

// Re-export commonly used types
pub use catalog::{
    AiModel, Candidate, Domain, DomainId, Feedback, FeedbackEntry, FeedbackId, FeedbackScore,
    GenerationOutput, ModelId, OutputContent, OutputId, OutputType, Prompt, PromptId,
};
pub use content::{
    ImageConstraints, ImageFormat, ImageRejection, POST_CHAR_LIMIT, TextCleaner, validate_image,
};
pub use core::error::DomainError;
pub use prompt::{
    CONTEXT_PLACEHOLDER, FeedbackSample, MetaPrompt, PromptTemplate, extract_revised_template,
    sample_history,
};
pub use selection::{
    CandidatePool, DEFAULT_TEMPERATURE, ScoredCandidate, SelectionMode, SelectionPolicy,
    aggregate_score,
};
