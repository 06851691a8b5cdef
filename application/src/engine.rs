//! Suggestion engine facade
//!
//! Wires the use cases over one store and one gateway so callers deal with a
//! single handle.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::ports::event_logger::EventLogger;
use crate::ports::generation_gateway::GenerationGateway;
use crate::ports::suggestion_store::SuggestionStore;
use crate::services::GenerationInvoker;
use crate::use_cases::get_suggestion::{GetSuggestionInput, GetSuggestionUseCase, Suggestion};
use crate::use_cases::manage_catalog::ManageCatalogUseCase;
use crate::use_cases::rewrite_prompt::{RewriteOutcome, RewritePromptUseCase};
use crate::use_cases::submit_feedback::SubmitFeedbackUseCase;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use studio_domain::{DomainId, FeedbackId, FeedbackScore, OutputId, OutputType, PromptId, SelectionMode};
use tokio_util::sync::CancellationToken;

/// Entry point for suggestions, feedback, rewrites and administration
pub struct SuggestionEngine {
    suggest: GetSuggestionUseCase,
    feedback: SubmitFeedbackUseCase,
    rewrite: RewritePromptUseCase,
    catalog: ManageCatalogUseCase,
}

impl SuggestionEngine {
    /// Fails only when the configuration is invalid (e.g. temperature <= 0)
    pub fn new(
        store: Arc<dyn SuggestionStore>,
        gateway: Arc<dyn GenerationGateway>,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        let invoker = Arc::new(GenerationInvoker::new(gateway, config.retry));
        Ok(Self {
            suggest: GetSuggestionUseCase::from_config(store.clone(), invoker.clone(), config)?,
            feedback: SubmitFeedbackUseCase::new(store.clone()),
            rewrite: RewritePromptUseCase::from_config(store.clone(), invoker, config),
            catalog: ManageCatalogUseCase::new(store),
        })
    }

    pub fn with_logger(self, logger: Arc<dyn EventLogger>) -> Self {
        Self {
            suggest: self.suggest.with_logger(logger.clone()),
            feedback: self.feedback.with_logger(logger.clone()),
            rewrite: self.rewrite.with_logger(logger),
            catalog: self.catalog,
        }
    }

    /// Select a candidate, generate, clean and store one output
    pub async fn get_suggestion(
        &self,
        context: Option<&str>,
        mode: SelectionMode,
        domain_id: Option<DomainId>,
        output_type: OutputType,
    ) -> Result<Suggestion, EngineError> {
        let input = GetSuggestionInput {
            context: context.map(str::to_string),
            mode,
            domain_id,
            output_type,
        };
        self.suggest.execute(input).await
    }

    /// Same as [`get_suggestion`](Self::get_suggestion) with a cancellation token
    pub async fn get_suggestion_with_cancel(
        &self,
        input: GetSuggestionInput,
        cancel: &CancellationToken,
    ) -> Result<Suggestion, EngineError> {
        let mut rng = SmallRng::from_entropy();
        self.suggest.execute_with(input, &mut rng, cancel).await
    }

    pub async fn submit_feedback(
        &self,
        output_id: OutputId,
        score: FeedbackScore,
        comment: Option<String>,
    ) -> Result<FeedbackId, EngineError> {
        self.feedback.execute(output_id, score, comment).await
    }

    pub async fn rewrite_prompt(&self, prompt_id: PromptId) -> Result<RewriteOutcome, EngineError> {
        self.rewrite.execute(prompt_id).await
    }

    pub async fn rewrite_prompt_with_cancel(
        &self,
        prompt_id: PromptId,
        cancel: &CancellationToken,
    ) -> Result<RewriteOutcome, EngineError> {
        self.rewrite.execute_with_cancel(prompt_id, cancel).await
    }

    pub fn catalog(&self) -> &ManageCatalogUseCase {
        &self.catalog
    }
}
