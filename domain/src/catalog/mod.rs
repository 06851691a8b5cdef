//! Catalog: the models, domains, prompts, outputs and feedback the engine
//! reasons about.
//!
//! - [`entities::AiModel`], [`entities::Domain`], [`entities::Prompt`]: administered rows
//! - [`entities::Candidate`]: a type-checked (model, prompt) pair
//! - [`output::GenerationOutput`], [`output::Feedback`]: append-only history
//! - [`seed`]: the default catalog a fresh store starts with

pub mod entities;
pub mod ids;
pub mod output;
pub mod seed;

pub use entities::{AiModel, Candidate, Domain, OutputType, Prompt};
pub use ids::{DomainId, FeedbackId, ModelId, OutputId, PromptId};
pub use output::{Feedback, FeedbackEntry, FeedbackScore, GenerationOutput, OutputContent};
