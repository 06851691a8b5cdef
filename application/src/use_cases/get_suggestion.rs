//! Get Suggestion use case
//!
//! Score the eligible candidates, pick one, generate, clean and persist.

use crate::config::{ContentLimits, EngineConfig};
use crate::error::{EngineError, GenerationError};
use crate::ports::event_logger::{EngineEvent, EventLogger, NoEventLogger};
use crate::ports::suggestion_store::SuggestionStore;
use crate::services::{FeedbackAggregator, Generated, GenerationInvoker, ResponseProcessor};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use studio_domain::{
    AiModel, DomainId, MetaPrompt, OutputContent, OutputId, OutputType, Prompt, SelectionMode,
    SelectionPolicy,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Input for the GetSuggestion use case
#[derive(Debug, Clone, PartialEq)]
pub struct GetSuggestionInput {
    /// Free text substituted into the prompt's placeholder
    pub context: Option<String>,
    pub mode: SelectionMode,
    /// Restrict prompts to one domain; `None` draws from all domains
    pub domain_id: Option<DomainId>,
    pub output_type: OutputType,
}

impl GetSuggestionInput {
    pub fn new(output_type: OutputType) -> Self {
        Self {
            context: None,
            mode: SelectionMode::default(),
            domain_id: None,
            output_type,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_domain(mut self, domain_id: DomainId) -> Self {
        self.domain_id = Some(domain_id);
        self
    }
}

/// A generated, cleaned and stored piece of content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub output_id: OutputId,
    pub model: AiModel,
    pub prompt: Prompt,
    pub content: OutputContent,
    /// Score of the pair at selection time
    pub score: i64,
    /// Provider calls made for the main generation
    pub attempts: u32,
}

/// Use case for producing one suggestion
pub struct GetSuggestionUseCase {
    store: Arc<dyn SuggestionStore>,
    aggregator: FeedbackAggregator,
    policy: SelectionPolicy,
    invoker: Arc<GenerationInvoker>,
    processor: ResponseProcessor,
    max_abbreviations: u32,
    logger: Arc<dyn EventLogger>,
}

impl GetSuggestionUseCase {
    pub fn new(
        store: Arc<dyn SuggestionStore>,
        invoker: Arc<GenerationInvoker>,
        policy: SelectionPolicy,
        limits: &ContentLimits,
    ) -> Self {
        Self {
            aggregator: FeedbackAggregator::new(store.clone()),
            store,
            policy,
            invoker,
            processor: ResponseProcessor::new(limits),
            max_abbreviations: limits.max_abbreviations,
            logger: Arc::new(NoEventLogger),
        }
    }

    pub fn from_config(
        store: Arc<dyn SuggestionStore>,
        invoker: Arc<GenerationInvoker>,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        let policy = SelectionPolicy::new(config.selection.temperature)?;
        Ok(Self::new(store, invoker, policy, &config.content))
    }

    pub fn with_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute with a fresh random source and no cancellation
    pub async fn execute(&self, input: GetSuggestionInput) -> Result<Suggestion, EngineError> {
        let mut rng = SmallRng::from_entropy();
        self.execute_with(input, &mut rng, &CancellationToken::new())
            .await
    }

    /// Execute with an injected random source and cancellation token
    pub async fn execute_with<R: Rng + Send + ?Sized>(
        &self,
        input: GetSuggestionInput,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> Result<Suggestion, EngineError> {
        let pool = self
            .aggregator
            .scored_candidates(input.output_type, input.domain_id)
            .await?;
        let picked = self.policy.select(&pool, input.mode, rng)?.clone();
        let model = picked.candidate.model;
        let prompt = picked.candidate.prompt;

        info!(
            "Selected {} with prompt {} ({} mode, score {}, {} candidate(s))",
            model.name,
            prompt.id,
            input.mode,
            picked.score,
            pool.len()
        );

        let Generated { content, attempts } = self
            .invoker
            .generate(
                &model,
                &prompt.template,
                input.context.as_deref(),
                input.output_type,
                cancel,
            )
            .await?;

        let content = match content {
            OutputContent::Text(raw) => {
                OutputContent::Text(self.fit_to_limit(&model, raw, cancel).await?)
            }
            image => image,
        };

        let content = self.processor.process(content).map_err(|rejection| {
            warn!("Discarding output from {}: {}", model.name, rejection);
            GenerationError::InvalidOutput {
                provider: self.invoker.provider().to_string(),
                reason: rejection.to_string(),
            }
        })?;

        let output_id = self
            .store
            .record_output(model.id, prompt.id, content.clone(), input.output_type)
            .await?;

        self.logger.log(EngineEvent::new(
            "suggestion_generated",
            serde_json::json!({
                "output_id": output_id,
                "model": model.name,
                "model_id": model.id,
                "prompt_id": prompt.id,
                "domain_id": prompt.domain_id,
                "output_type": input.output_type,
                "mode": input.mode,
                "score": picked.score,
                "candidates": pool.len(),
                "attempts": attempts,
                "content": content.describe(),
            }),
        ));

        Ok(Suggestion {
            output_id,
            model,
            prompt,
            content,
            score: picked.score,
            attempts,
        })
    }

    /// Ask the same model to shorten an over-long draft.
    ///
    /// A failed abbreviation keeps the draft; cleaning truncates it later.
    /// Cancellation is the exception and propagates.
    async fn fit_to_limit(
        &self,
        model: &AiModel,
        draft: String,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        let mut text = draft;
        let mut round = 0;
        while round < self.max_abbreviations && self.processor.exceeds_limit(&text) {
            round += 1;
            info!(
                "Draft from {} exceeds {} characters, abbreviating (round {})",
                model.name,
                self.processor.max_chars(),
                round
            );
            let request = MetaPrompt::abbreviate(&text, self.processor.max_chars());
            match self
                .invoker
                .generate_raw(model, &request, OutputType::Text, cancel)
                .await
            {
                Ok(Generated {
                    content: OutputContent::Text(shorter),
                    ..
                }) => text = shorter,
                Ok(other) => {
                    debug!("Ignoring non-text abbreviation: {}", other.content.describe());
                    break;
                }
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!("Abbreviation failed, truncating instead: {}", e);
                    break;
                }
            }
        }
        Ok(text)
    }
}
