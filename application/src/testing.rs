//! Test doubles shared by the use case and service tests.

use crate::ports::event_logger::{EngineEvent, EventLogger};
use crate::ports::generation_gateway::{GenerationGateway, ProviderError};
use crate::ports::suggestion_store::{StoreError, SuggestionStore};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use studio_domain::{
    AiModel, Candidate, Domain, DomainError, DomainId, Feedback, FeedbackEntry, FeedbackId,
    FeedbackScore, GenerationOutput, ModelId, OutputContent, OutputId, OutputType, Prompt,
    PromptId, PromptTemplate,
};

// ==================== Store ====================

#[derive(Default)]
struct Tables {
    models: Vec<AiModel>,
    domains: Vec<Domain>,
    prompts: Vec<Prompt>,
    outputs: Vec<GenerationOutput>,
    feedback: Vec<Feedback>,
    next_id: u64,
    clock: i64,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps so ordering tests are deterministic
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + ChronoDuration::seconds(self.clock)
    }
}

/// Minimal in-memory store
pub(crate) struct MockStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        let tables = Tables {
            domains: vec![Domain::new(DomainId::DEFAULT, "General").unwrap()],
            next_id: 1,
            ..Default::default()
        };
        Self {
            tables: Mutex::new(tables),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub(crate) fn model(&self, name: &str, text: bool, image: bool) -> AiModel {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let model = AiModel::new(ModelId(id), name, text, image).unwrap();
        tables.models.push(model.clone());
        model
    }

    pub(crate) fn prompt(&self, domain_id: DomainId, template: &str, output_type: OutputType) -> Prompt {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let prompt = Prompt::new(PromptId(id), domain_id, template, output_type).unwrap();
        tables.prompts.push(prompt.clone());
        prompt
    }

    pub(crate) fn domain(&self, name: &str) -> Domain {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let domain = Domain::new(DomainId(id), name).unwrap();
        tables.domains.push(domain.clone());
        domain
    }

    /// Insert a past output of the pair and attach the given votes
    pub(crate) fn output_with_votes(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
        text: &str,
        votes: &[FeedbackScore],
    ) -> OutputId {
        let mut tables = self.tables.lock().unwrap();
        let id = OutputId(tables.next_id());
        let created_at = tables.tick();
        tables.outputs.push(GenerationOutput {
            id,
            model_id,
            prompt_id,
            content: OutputContent::Text(text.to_string()),
            output_type: OutputType::Text,
            created_at,
        });
        for score in votes {
            let feedback_id = FeedbackId(tables.next_id());
            let created_at = tables.tick();
            tables.feedback.push(Feedback {
                id: feedback_id,
                output_id: id,
                score: *score,
                comment: None,
                created_at,
            });
        }
        id
    }

    pub(crate) fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub(crate) fn output_count(&self) -> usize {
        self.tables.lock().unwrap().outputs.len()
    }

    pub(crate) fn feedback_count(&self) -> usize {
        self.tables.lock().unwrap().feedback.len()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io("disk full".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SuggestionStore for MockStore {
    async fn list_candidates(
        &self,
        output_type: OutputType,
        domain_id: Option<DomainId>,
    ) -> Result<Vec<Candidate>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut candidates = Vec::new();
        for model in tables.models.iter().filter(|m| m.supports(output_type)) {
            for prompt in tables.prompts.iter().filter(|p| {
                p.output_type == output_type && domain_id.is_none_or(|d| p.domain_id == d)
            }) {
                candidates.push(Candidate::new(model.clone(), prompt.clone())?);
            }
        }
        Ok(candidates)
    }

    async fn record_output(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
        content: OutputContent,
        output_type: OutputType,
    ) -> Result<OutputId, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        if content.output_type() != output_type {
            return Err(StoreError::Conflict("content does not match output type".into()));
        }
        let id = OutputId(tables.next_id());
        let created_at = tables.tick();
        tables.outputs.push(GenerationOutput {
            id,
            model_id,
            prompt_id,
            content,
            output_type,
            created_at,
        });
        Ok(id)
    }

    async fn get_output(&self, output_id: OutputId) -> Result<GenerationOutput, StoreError> {
        let tables = self.tables.lock().unwrap();
        tables
            .outputs
            .iter()
            .find(|o| o.id == output_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("output", output_id.get()))
    }

    async fn record_feedback(
        &self,
        output_id: OutputId,
        score: FeedbackScore,
        comment: Option<String>,
    ) -> Result<FeedbackId, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.outputs.iter().any(|o| o.id == output_id) {
            return Err(StoreError::not_found("output", output_id.get()));
        }
        let id = FeedbackId(tables.next_id());
        let created_at = tables.tick();
        tables.feedback.push(Feedback {
            id,
            output_id,
            score,
            comment,
            created_at,
        });
        Ok(id)
    }

    async fn feedback_history(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
    ) -> Result<Vec<FeedbackEntry>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut entries = Vec::new();
        for output in tables
            .outputs
            .iter()
            .filter(|o| o.model_id == model_id && o.prompt_id == prompt_id)
        {
            for vote in tables.feedback.iter().filter(|f| f.output_id == output.id) {
                entries.push(FeedbackEntry {
                    output_id: output.id,
                    content: output.content.clone(),
                    score: vote.score,
                    created_at: vote.created_at,
                });
            }
        }
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    async fn last_used(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .outputs
            .iter()
            .filter(|o| o.model_id == model_id && o.prompt_id == prompt_id)
            .map(|o| o.created_at)
            .max())
    }

    async fn get_prompt(&self, prompt_id: PromptId) -> Result<Prompt, StoreError> {
        let tables = self.tables.lock().unwrap();
        tables
            .prompts
            .iter()
            .find(|p| p.id == prompt_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("prompt", prompt_id.get()))
    }

    async fn update_prompt_text(
        &self,
        prompt_id: PromptId,
        template: PromptTemplate,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let prompt = tables
            .prompts
            .iter_mut()
            .find(|p| p.id == prompt_id)
            .ok_or_else(|| StoreError::not_found("prompt", prompt_id.get()))?;
        prompt.template = template;
        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<AiModel>, StoreError> {
        Ok(self.tables.lock().unwrap().models.clone())
    }

    async fn add_model(
        &self,
        name: &str,
        produces_text: bool,
        produces_image: bool,
    ) -> Result<AiModel, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let id = ModelId(tables.next_id());
        let model = AiModel::new(id, name, produces_text, produces_image)?;
        tables.models.push(model.clone());
        Ok(model)
    }

    async fn remove_model(&self, model_id: ModelId) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.models.len();
        tables.models.retain(|m| m.id != model_id);
        if tables.models.len() == before {
            return Err(StoreError::not_found("model", model_id.get()));
        }
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<Domain>, StoreError> {
        Ok(self.tables.lock().unwrap().domains.clone())
    }

    async fn add_domain(&self, name: &str) -> Result<Domain, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let id = DomainId(tables.next_id());
        let domain = Domain::new(id, name)?;
        tables.domains.push(domain.clone());
        Ok(domain)
    }

    async fn remove_domain(&self, domain_id: DomainId) -> Result<(), StoreError> {
        if domain_id.is_default() {
            return Err(DomainError::DefaultDomainProtected.into());
        }
        let mut tables = self.tables.lock().unwrap();
        tables.domains.retain(|d| d.id != domain_id);
        tables.prompts.retain(|p| p.domain_id != domain_id);
        Ok(())
    }

    async fn list_prompts(&self, domain_id: Option<DomainId>) -> Result<Vec<Prompt>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .prompts
            .iter()
            .filter(|p| domain_id.is_none_or(|d| p.domain_id == d))
            .cloned()
            .collect())
    }

    async fn add_prompt(
        &self,
        domain_id: DomainId,
        template: PromptTemplate,
        output_type: OutputType,
    ) -> Result<Prompt, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.domains.iter().any(|d| d.id == domain_id) {
            return Err(StoreError::not_found("domain", domain_id.get()));
        }
        let id = PromptId(tables.next_id());
        let prompt = Prompt {
            id,
            domain_id,
            template,
            output_type,
        };
        tables.prompts.push(prompt.clone());
        Ok(prompt)
    }

    async fn remove_prompt(&self, prompt_id: PromptId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.prompts.retain(|p| p.id != prompt_id);
        Ok(())
    }
}

// ==================== Gateway ====================

/// Gateway that replays a script of results, one per call
pub(crate) struct ScriptedGateway {
    script: Mutex<VecDeque<Result<OutputContent, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedGateway {
    pub(crate) fn new(script: Vec<Result<OutputContent, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(script)),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn texts(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| Ok(OutputContent::Text(t.to_string())))
                .collect(),
        )
    }

    /// Every call sleeps this long before answering
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    async fn next(&self, prompt: &str) -> Result<OutputContent, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::MalformedResponse("script exhausted".into())))
    }
}

#[async_trait]
impl GenerationGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate_text(
        &self,
        _model: &AiModel,
        prompt: &str,
        _timeout: Duration,
    ) -> Result<String, ProviderError> {
        match self.next(prompt).await? {
            OutputContent::Text(text) => Ok(text),
            other => Err(ProviderError::MalformedResponse(other.describe())),
        }
    }

    async fn generate_image(
        &self,
        _model: &AiModel,
        prompt: &str,
        _timeout: Duration,
    ) -> Result<OutputContent, ProviderError> {
        self.next(prompt).await
    }
}

// ==================== Event logger ====================

/// Logger that keeps event types and payloads in memory
#[derive(Default)]
pub(crate) struct RecordingLogger {
    events: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl RecordingLogger {
    pub(crate) fn events(&self) -> Vec<(&'static str, serde_json::Value)> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn types(&self) -> Vec<&'static str> {
        self.events().into_iter().map(|(t, _)| t).collect()
    }
}

impl EventLogger for RecordingLogger {
    fn log(&self, event: EngineEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type, event.payload));
    }
}
