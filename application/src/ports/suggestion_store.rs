//! Suggestion store port
//!
//! Persistence for the catalog (models, domains, prompts), generated outputs
//! and the feedback log. Adapters live in the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studio_domain::{
    AiModel, Candidate, Domain, DomainError, DomainId, FeedbackEntry, FeedbackId, FeedbackScore,
    GenerationOutput, ModelId, OutputContent, OutputId, OutputType, Prompt, PromptId,
    PromptTemplate,
};
use thiserror::Error;

/// Errors that can occur in a store operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The row the caller asked to write would break a domain rule
    #[error(transparent)]
    Rejected(#[from] DomainError),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Storage for everything the engine reads and writes
///
/// Every method is a single logical operation. Implementations must make
/// each write atomic with respect to concurrent readers: a reader sees a
/// vote (or a prompt rewrite) either fully or not at all.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    // ==================== Engine operations ====================

    /// Every (model, prompt) pair whose model can produce `output_type`,
    /// optionally restricted to prompts of one domain.
    async fn list_candidates(
        &self,
        output_type: OutputType,
        domain_id: Option<DomainId>,
    ) -> Result<Vec<Candidate>, StoreError>;

    /// Persist a generated output. Fails if the model, prompt and content
    /// do not agree on the output type.
    async fn record_output(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
        content: OutputContent,
        output_type: OutputType,
    ) -> Result<OutputId, StoreError>;

    async fn get_output(&self, output_id: OutputId) -> Result<GenerationOutput, StoreError>;

    /// Append one vote. Votes are never overwritten.
    async fn record_feedback(
        &self,
        output_id: OutputId,
        score: FeedbackScore,
        comment: Option<String>,
    ) -> Result<FeedbackId, StoreError>;

    /// Every vote on outputs of this pair, oldest first
    async fn feedback_history(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
    ) -> Result<Vec<FeedbackEntry>, StoreError>;

    /// Creation time of the newest output this pair produced
    async fn last_used(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
    ) -> Result<Option<DateTime<Utc>>, StoreError>;

    async fn get_prompt(&self, prompt_id: PromptId) -> Result<Prompt, StoreError>;

    /// Replace a prompt's text in place; its identity does not change
    async fn update_prompt_text(
        &self,
        prompt_id: PromptId,
        template: PromptTemplate,
    ) -> Result<(), StoreError>;

    // ==================== Catalog administration ====================

    async fn list_models(&self) -> Result<Vec<AiModel>, StoreError>;

    async fn add_model(
        &self,
        name: &str,
        produces_text: bool,
        produces_image: bool,
    ) -> Result<AiModel, StoreError>;

    /// Removes the model together with its outputs and their feedback
    async fn remove_model(&self, model_id: ModelId) -> Result<(), StoreError>;

    async fn list_domains(&self) -> Result<Vec<Domain>, StoreError>;

    async fn add_domain(&self, name: &str) -> Result<Domain, StoreError>;

    /// Removes the domain together with its prompts. The default domain is
    /// refused with [`DomainError::DefaultDomainProtected`].
    async fn remove_domain(&self, domain_id: DomainId) -> Result<(), StoreError>;

    async fn list_prompts(&self, domain_id: Option<DomainId>) -> Result<Vec<Prompt>, StoreError>;

    async fn add_prompt(
        &self,
        domain_id: DomainId,
        template: PromptTemplate,
        output_type: OutputType,
    ) -> Result<Prompt, StoreError>;

    /// Removes the prompt together with its outputs and their feedback
    async fn remove_prompt(&self, prompt_id: PromptId) -> Result<(), StoreError>;
}
