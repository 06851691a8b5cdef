//! Catalog administration
//!
//! Thin validated wrappers over the store's catalog operations, plus the
//! per-pair feedback report.

use crate::error::EngineError;
use crate::ports::suggestion_store::SuggestionStore;
use crate::services::FeedbackAggregator;
use serde::Serialize;
use std::sync::Arc;
use studio_domain::{
    AiModel, Domain, DomainError, DomainId, FeedbackEntry, ModelId, OutputType, Prompt, PromptId,
    PromptTemplate, aggregate_score,
};
use tracing::info;

/// Feedback report for one (model, prompt) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairHistory {
    pub model_id: ModelId,
    pub prompt_id: PromptId,
    pub score: i64,
    pub entries: Vec<FeedbackEntry>,
}

/// Use case for listing, adding and removing catalog rows
pub struct ManageCatalogUseCase {
    store: Arc<dyn SuggestionStore>,
    aggregator: FeedbackAggregator,
}

impl ManageCatalogUseCase {
    pub fn new(store: Arc<dyn SuggestionStore>) -> Self {
        Self {
            aggregator: FeedbackAggregator::new(store.clone()),
            store,
        }
    }

    // ==================== Models ====================

    pub async fn list_models(&self) -> Result<Vec<AiModel>, EngineError> {
        Ok(self.store.list_models().await?)
    }

    pub async fn add_model(
        &self,
        name: &str,
        produces_text: bool,
        produces_image: bool,
    ) -> Result<AiModel, EngineError> {
        let name = required("model name", name)?;
        if !produces_text && !produces_image {
            return Err(DomainError::NoCapabilities(name.to_string()).into());
        }
        let model = self
            .store
            .add_model(name, produces_text, produces_image)
            .await?;
        info!("Added model {} ({})", model.name, model.capability_label());
        Ok(model)
    }

    pub async fn remove_model(&self, model_id: ModelId) -> Result<(), EngineError> {
        self.store.remove_model(model_id).await?;
        info!("Removed model {}", model_id);
        Ok(())
    }

    // ==================== Domains ====================

    pub async fn list_domains(&self) -> Result<Vec<Domain>, EngineError> {
        Ok(self.store.list_domains().await?)
    }

    pub async fn add_domain(&self, name: &str) -> Result<Domain, EngineError> {
        let name = required("domain name", name)?;
        let domain = self.store.add_domain(name).await?;
        info!("Added domain {} ({})", domain.name, domain.id);
        Ok(domain)
    }

    /// Removes a domain and its prompts; the default domain is protected
    pub async fn remove_domain(&self, domain_id: DomainId) -> Result<(), EngineError> {
        if domain_id.is_default() {
            return Err(DomainError::DefaultDomainProtected.into());
        }
        self.store.remove_domain(domain_id).await?;
        info!("Removed domain {}", domain_id);
        Ok(())
    }

    // ==================== Prompts ====================

    pub async fn list_prompts(&self, domain_id: Option<DomainId>) -> Result<Vec<Prompt>, EngineError> {
        Ok(self.store.list_prompts(domain_id).await?)
    }

    pub async fn add_prompt(
        &self,
        domain_id: DomainId,
        text: &str,
        output_type: OutputType,
    ) -> Result<Prompt, EngineError> {
        let template = PromptTemplate::parse(text.trim())?;
        let prompt = self.store.add_prompt(domain_id, template, output_type).await?;
        info!(
            "Added {} prompt {} to domain {}",
            prompt.output_type, prompt.id, prompt.domain_id
        );
        Ok(prompt)
    }

    pub async fn remove_prompt(&self, prompt_id: PromptId) -> Result<(), EngineError> {
        self.store.remove_prompt(prompt_id).await?;
        info!("Removed prompt {}", prompt_id);
        Ok(())
    }

    // ==================== Feedback ====================

    pub async fn history(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
    ) -> Result<PairHistory, EngineError> {
        let entries = self.aggregator.history(model_id, prompt_id).await?;
        Ok(PairHistory {
            model_id,
            prompt_id,
            score: aggregate_score(entries.iter().map(|e| e.score)),
            entries,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    Ok(value)
}
