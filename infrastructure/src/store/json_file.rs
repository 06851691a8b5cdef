//! JSON file suggestion store
//!
//! The whole catalog lives in one JSON document. Every mutation is applied
//! to a copy of the tables, written to a temp file in the same directory and
//! renamed over the original; only then does the in-memory copy change.

use super::tables::CatalogTables;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use studio_application::{StoreError, SuggestionStore};
use studio_domain::{
    AiModel, Candidate, Domain, DomainId, FeedbackEntry, FeedbackId, FeedbackScore,
    GenerationOutput, ModelId, OutputContent, OutputId, OutputType, Prompt, PromptId,
    PromptTemplate,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Store persisted to a single JSON file
pub struct JsonFileStore {
    path: PathBuf,
    tables: RwLock<CatalogTables>,
}

impl JsonFileStore {
    /// Open the store at `path`, seeding a new file with the default catalog
    /// when none exists yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error(&path, e))?;

        let tables = if exists {
            let data = tokio::fs::read(&path)
                .await
                .map_err(|e| io_error(&path, e))?;
            let tables: CatalogTables = serde_json::from_slice(&data).map_err(|e| {
                StoreError::Serialization(format!("{}: {}", path.display(), e))
            })?;
            debug!("Loaded store from {}", path.display());
            tables
        } else {
            let tables = CatalogTables::seeded();
            persist(&path, &tables).await?;
            info!("Created new store at {}", path.display());
            tables
        };

        Ok(Self {
            path,
            tables: RwLock::new(tables),
        })
    }

    /// Default location: `<data dir>/x-studio/store.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("x-studio").join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn mutate<T, F>(&self, change: F) -> Result<T, StoreError>
    where
        T: Send,
        F: FnOnce(&mut CatalogTables) -> Result<T, StoreError> + Send,
    {
        let mut guard = self.tables.write().await;
        let mut next = guard.clone();
        let value = change(&mut next)?;
        persist(&self.path, &next).await?;
        *guard = next;
        Ok(value)
    }
}

fn io_error(path: &Path, error: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {}", path.display(), error))
}

async fn persist(path: &Path, tables: &CatalogTables) -> Result<(), StoreError> {
    let data = serde_json::to_vec_pretty(tables)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || atomic_write(&path, &data))
        .await
        .map_err(|e| StoreError::Io(e.to_string()))?
}

/// Write to a temp file in the target directory, then rename over `path`
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    temp.write_all(data).map_err(|e| io_error(path, e))?;
    temp.as_file().sync_all().map_err(|e| io_error(path, e))?;
    temp.persist(path).map_err(|e| io_error(path, e.error))?;
    Ok(())
}

#[async_trait]
impl SuggestionStore for JsonFileStore {
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
        self.mutate(move |t| t.record_output(model_id, prompt_id, content, output_type, Utc::now()))
            .await
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
        self.mutate(move |t| t.record_feedback(output_id, score, comment, Utc::now()))
            .await
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
        self.mutate(move |t| t.update_prompt_text(prompt_id, template))
            .await
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
        self.mutate(|t| t.add_model(name, produces_text, produces_image))
            .await
    }

    async fn remove_model(&self, model_id: ModelId) -> Result<(), StoreError> {
        self.mutate(|t| t.remove_model(model_id)).await
    }

    async fn list_domains(&self) -> Result<Vec<Domain>, StoreError> {
        Ok(self.tables.read().await.domains())
    }

    async fn add_domain(&self, name: &str) -> Result<Domain, StoreError> {
        self.mutate(|t| t.add_domain(name)).await
    }

    async fn remove_domain(&self, domain_id: DomainId) -> Result<(), StoreError> {
        self.mutate(|t| t.remove_domain(domain_id)).await
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
        self.mutate(move |t| t.add_prompt(domain_id, template, output_type))
            .await
    }

    async fn remove_prompt(&self, prompt_id: PromptId) -> Result<(), StoreError> {
        self.mutate(|t| t.remove_prompt(prompt_id)).await
    }
}
