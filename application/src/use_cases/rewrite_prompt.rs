//! Rewrite Prompt use case
//!
//! Ask a text model to improve a prompt template from its feedback history.
//! The stored prompt is only replaced when the revision is usable.

use crate::config::{EngineConfig, RewriteParams};
use crate::error::{EngineError, GenerationError};
use crate::ports::event_logger::{EngineEvent, EventLogger, NoEventLogger};
use crate::ports::suggestion_store::SuggestionStore;
use crate::services::{FeedbackAggregator, GenerationInvoker};
use serde::Serialize;
use std::sync::Arc;
use studio_domain::core::string::preview;
use studio_domain::{
    AiModel, DomainError, MetaPrompt, OutputType, PromptId, extract_revised_template,
    sample_history,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Result of a successful rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteOutcome {
    pub prompt_id: PromptId,
    pub previous: String,
    pub revised: String,
    /// Name of the model that wrote the revision
    pub rewriter: String,
    /// Number of rated outputs shown to the rewriter
    pub samples: usize,
}

/// Use case for rewriting one prompt
pub struct RewritePromptUseCase {
    store: Arc<dyn SuggestionStore>,
    aggregator: FeedbackAggregator,
    invoker: Arc<GenerationInvoker>,
    params: RewriteParams,
    logger: Arc<dyn EventLogger>,
}

impl RewritePromptUseCase {
    pub fn new(
        store: Arc<dyn SuggestionStore>,
        invoker: Arc<GenerationInvoker>,
        params: RewriteParams,
    ) -> Self {
        Self {
            aggregator: FeedbackAggregator::new(store.clone()),
            store,
            invoker,
            params,
            logger: Arc::new(NoEventLogger),
        }
    }

    pub fn from_config(
        store: Arc<dyn SuggestionStore>,
        invoker: Arc<GenerationInvoker>,
        config: &EngineConfig,
    ) -> Self {
        Self::new(store, invoker, config.rewrite.clone())
    }

    pub fn with_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn execute(&self, prompt_id: PromptId) -> Result<RewriteOutcome, EngineError> {
        self.execute_with_cancel(prompt_id, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_cancel(
        &self,
        prompt_id: PromptId,
        cancel: &CancellationToken,
    ) -> Result<RewriteOutcome, EngineError> {
        let prompt = self.store.get_prompt(prompt_id).await?;
        let rewriter = self.rewriter_model().await?;
        let history = self.aggregator.prompt_history(prompt_id).await?;
        let samples = sample_history(&history, self.params.sample_size);

        info!(
            "Rewriting prompt {} with {} ({} vote(s), {} sample(s))",
            prompt_id,
            rewriter.name,
            history.len(),
            samples.len()
        );

        let request = MetaPrompt::rewrite(&prompt.template, &samples);
        let generated = self
            .invoker
            .generate_raw(&rewriter, &request, OutputType::Text, cancel)
            .await?;
        let raw = generated.content.as_text().unwrap_or_default().to_string();

        let revised = match extract_revised_template(&raw) {
            Ok(template) if template == prompt.template => {
                return Err(self.reject(prompt_id, &raw, "revision is identical to the current text"));
            }
            Ok(template) => template,
            Err(e) => return Err(self.reject(prompt_id, &raw, &e.to_string())),
        };

        self.store
            .update_prompt_text(prompt_id, revised.clone())
            .await?;

        let outcome = RewriteOutcome {
            prompt_id,
            previous: prompt.text().to_string(),
            revised: revised.as_str().to_string(),
            rewriter: rewriter.name,
            samples: samples.len(),
        };
        self.logger.log(EngineEvent::new(
            "prompt_rewritten",
            serde_json::json!({
                "prompt_id": prompt_id,
                "domain_id": prompt.domain_id,
                "output_type": prompt.output_type,
                "previous": outcome.previous,
                "revised": outcome.revised,
                "rewriter": outcome.rewriter,
                "samples": outcome.samples,
            }),
        ));
        Ok(outcome)
    }

    /// The configured rewriter, else the first text-capable model
    async fn rewriter_model(&self) -> Result<AiModel, EngineError> {
        let models = self.store.list_models().await?;
        let text_models: Vec<AiModel> = models
            .into_iter()
            .filter(|m| m.supports(OutputType::Text))
            .collect();

        if let Some(name) = &self.params.model {
            if let Some(model) = text_models.iter().find(|m| &m.name == name) {
                return Ok(model.clone());
            }
            warn!(
                "Configured rewrite model {} is not a text model in the catalog, using the first one",
                name
            );
        }

        let count = text_models.len();
        text_models.into_iter().next().ok_or_else(|| {
            DomainError::NoCandidates {
                output_type: OutputType::Text,
                domain_id: None,
                candidate_count: count,
            }
            .into()
        })
    }

    fn reject(&self, prompt_id: PromptId, raw: &str, reason: &str) -> EngineError {
        warn!("Rejected rewrite of prompt {}: {}", prompt_id, reason);
        self.logger.log(EngineEvent::new(
            "prompt_rewrite_rejected",
            serde_json::json!({
                "prompt_id": prompt_id,
                "reason": reason,
                "response": preview(raw, 500),
            }),
        ));
        GenerationError::InvalidOutput {
            provider: self.invoker.provider().to_string(),
            reason: reason.to_string(),
        }
        .into()
    }
}
