//! In-memory suggestion store

use super::tables::CatalogTables;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studio_application::{StoreError, SuggestionStore};
use studio_domain::{
    AiModel, Candidate, Domain, DomainId, FeedbackEntry, FeedbackId, FeedbackScore,
    GenerationOutput, ModelId, OutputContent, OutputId, OutputType, Prompt, PromptId,
    PromptTemplate,
};
use tokio::sync::RwLock;

/// Store that lives for the lifetime of the process.
///
/// Each write runs inside a single `RwLock` write section.
pub struct InMemoryStore {
    tables: RwLock<CatalogTables>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// A store holding the default catalog
    pub fn new() -> Self {
        Self::from_tables(CatalogTables::seeded())
    }

    /// A store holding only the default domain
    pub fn empty() -> Self {
        Self::from_tables(CatalogTables::empty())
    }

    pub fn from_tables(tables: CatalogTables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    pub async fn snapshot(&self) -> CatalogTables {
        self.tables.read().await.clone()
    }
}

#[async_trait]
impl SuggestionStore for InMemoryStore {
    async fn list_candidates(
        &self,
        output_type: OutputType,
        domain_id: Option<DomainId>,
    ) -> Result<Vec<Candidate>, StoreError> {
        self.tables.read().await.candidates(output_type, domain_id)
    }

    async fn record_output(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
        content: OutputContent,
        output_type: OutputType,
    ) -> Result<OutputId, StoreError> {
        self.tables
            .write()
            .await
            .record_output(model_id, prompt_id, content, output_type, Utc::now())
    }

    async fn get_output(&self, output_id: OutputId) -> Result<GenerationOutput, StoreError> {
        self.tables.read().await.output(output_id)
    }

    async fn record_feedback(
        &self,
        output_id: OutputId,
        score: FeedbackScore,
        comment: Option<String>,
    ) -> Result<FeedbackId, StoreError> {
        self.tables
            .write()
            .await
            .record_feedback(output_id, score, comment, Utc::now())
    }

    async fn feedback_history(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
    ) -> Result<Vec<FeedbackEntry>, StoreError> {
        Ok(self.tables.read().await.feedback_history(model_id, prompt_id))
    }

    async fn last_used(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.tables.read().await.last_used(model_id, prompt_id))
    }

    async fn get_prompt(&self, prompt_id: PromptId) -> Result<Prompt, StoreError> {
        self.tables.read().await.prompt(prompt_id)
    }

    async fn update_prompt_text(
        &self,
        prompt_id: PromptId,
        template: PromptTemplate,
    ) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .update_prompt_text(prompt_id, template)
    }

    async fn list_models(&self) -> Result<Vec<AiModel>, StoreError> {
        Ok(self.tables.read().await.models())
    }

    async fn add_model(
        &self,
        name: &str,
        produces_text: bool,
        produces_image: bool,
    ) -> Result<AiModel, StoreError> {
        self.tables
            .write()
            .await
            .add_model(name, produces_text, produces_image)
    }

    async fn remove_model(&self, model_id: ModelId) -> Result<(), StoreError> {
        self.tables.write().await.remove_model(model_id)
    }

    async fn list_domains(&self) -> Result<Vec<Domain>, StoreError> {
        Ok(self.tables.read().await.domains())
    }

    async fn add_domain(&self, name: &str) -> Result<Domain, StoreError> {
        self.tables.write().await.add_domain(name)
    }

    async fn remove_domain(&self, domain_id: DomainId) -> Result<(), StoreError> {
        self.tables.write().await.remove_domain(domain_id)
    }

    async fn list_prompts(&self, domain_id: Option<DomainId>) -> Result<Vec<Prompt>, StoreError> {
        Ok(self.tables.read().await.prompts(domain_id))
    }

    async fn add_prompt(
        &self,
        domain_id: DomainId,
        template: PromptTemplate,
        output_type: OutputType,
    ) -> Result<Prompt, StoreError> {
        self.tables
            .write()
            .await
            .add_prompt(domain_id, template, output_type)
    }

    async fn remove_prompt(&self, prompt_id: PromptId) -> Result<(), StoreError> {
        self.tables.write().await.remove_prompt(prompt_id)
    }
}
