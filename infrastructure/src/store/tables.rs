//! Catalog tables shared by the store adapters
//!
//! Plain vectors with per-table id counters. All integrity rules live here
//! so the in-memory and file-backed stores behave identically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studio_application::StoreError;
use studio_domain::catalog::seed::{DEFAULT_DOMAIN_NAME, DEFAULT_MODELS, DEFAULT_PROMPTS};
use studio_domain::{
    AiModel, Candidate, Domain, DomainError, DomainId, Feedback, FeedbackEntry, FeedbackId,
    FeedbackScore, GenerationOutput, ModelId, OutputContent, OutputId, OutputType, Prompt,
    PromptId, PromptTemplate,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct NextIds {
    model: u64,
    domain: u64,
    prompt: u64,
    output: u64,
    feedback: u64,
}

fn bump(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// Every table of the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogTables {
    models: Vec<AiModel>,
    domains: Vec<Domain>,
    prompts: Vec<Prompt>,
    outputs: Vec<GenerationOutput>,
    feedback: Vec<Feedback>,
    next_ids: NextIds,
}

impl CatalogTables {
    /// Tables holding only the default domain
    pub fn empty() -> Self {
        let mut tables = Self::default();
        let id = DomainId(bump(&mut tables.next_ids.domain));
        tables.domains.push(Domain {
            id,
            name: DEFAULT_DOMAIN_NAME.to_string(),
        });
        tables
    }

    /// The default catalog: seed models, the default domain and its prompts
    pub fn seeded() -> Self {
        let mut tables = Self::empty();
        for (name, text, image) in DEFAULT_MODELS {
            let id = ModelId(bump(&mut tables.next_ids.model));
            tables.models.push(AiModel {
                id,
                name: name.to_string(),
                produces_text: *text,
                produces_image: *image,
            });
        }
        for (text, output_type) in DEFAULT_PROMPTS {
            if let Ok(template) = PromptTemplate::parse(*text) {
                let id = PromptId(bump(&mut tables.next_ids.prompt));
                tables.prompts.push(Prompt {
                    id,
                    domain_id: DomainId::DEFAULT,
                    template,
                    output_type: *output_type,
                });
            }
        }
        tables
    }

    // ==================== Reads ====================

    /// Eligible pairs ordered by (model id, prompt id)
    pub fn candidates(
        &self,
        output_type: OutputType,
        domain_id: Option<DomainId>,
    ) -> Result<Vec<Candidate>, StoreError> {
        let mut candidates = Vec::new();
        for model in self.models.iter().filter(|m| m.supports(output_type)) {
            for prompt in self.prompts.iter().filter(|p| {
                p.output_type == output_type && domain_id.is_none_or(|d| p.domain_id == d)
            }) {
                candidates.push(Candidate::new(model.clone(), prompt.clone())?);
            }
        }
        candidates.sort_by_key(Candidate::sort_key);
        Ok(candidates)
    }

    pub fn output(&self, output_id: OutputId) -> Result<GenerationOutput, StoreError> {
        self.outputs
            .iter()
            .find(|o| o.id == output_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("output", output_id.get()))
    }

    pub fn prompt(&self, prompt_id: PromptId) -> Result<Prompt, StoreError> {
        self.prompts
            .iter()
            .find(|p| p.id == prompt_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("prompt", prompt_id.get()))
    }

    fn model(&self, model_id: ModelId) -> Result<&AiModel, StoreError> {
        self.models
            .iter()
            .find(|m| m.id == model_id)
            .ok_or_else(|| StoreError::not_found("model", model_id.get()))
    }

    /// Votes on every output of the pair, oldest first
    pub fn feedback_history(&self, model_id: ModelId, prompt_id: PromptId) -> Vec<FeedbackEntry> {
        let mut entries: Vec<(FeedbackId, FeedbackEntry)> = Vec::new();
        for output in self
            .outputs
            .iter()
            .filter(|o| o.model_id == model_id && o.prompt_id == prompt_id)
        {
            for vote in self.feedback.iter().filter(|f| f.output_id == output.id) {
                entries.push((
                    vote.id,
                    FeedbackEntry {
                        output_id: output.id,
                        content: output.content.clone(),
                        score: vote.score,
                        created_at: vote.created_at,
                    },
                ));
            }
        }
        entries.sort_by_key(|(id, entry)| (entry.created_at, *id));
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    pub fn last_used(&self, model_id: ModelId, prompt_id: PromptId) -> Option<DateTime<Utc>> {
        self.outputs
            .iter()
            .filter(|o| o.model_id == model_id && o.prompt_id == prompt_id)
            .map(|o| o.created_at)
            .max()
    }

    pub fn models(&self) -> Vec<AiModel> {
        self.models.clone()
    }

    pub fn domains(&self) -> Vec<Domain> {
        self.domains.clone()
    }

    pub fn prompts(&self, domain_id: Option<DomainId>) -> Vec<Prompt> {
        self.prompts
            .iter()
            .filter(|p| domain_id.is_none_or(|d| p.domain_id == d))
            .cloned()
            .collect()
    }

    // ==================== Writes ====================

    pub fn record_output(
        &mut self,
        model_id: ModelId,
        prompt_id: PromptId,
        content: OutputContent,
        output_type: OutputType,
        now: DateTime<Utc>,
    ) -> Result<OutputId, StoreError> {
        let model = self.model(model_id)?;
        let prompt = self.prompt(prompt_id)?;
        if !model.supports(output_type) {
            return Err(DomainError::TypeMismatch {
                model: model.name.clone(),
                output_type,
            }
            .into());
        }
        if prompt.output_type != output_type || content.output_type() != output_type {
            return Err(StoreError::Conflict(format!(
                "prompt {} produces {} but {} content was given as {}",
                prompt_id,
                prompt.output_type,
                content.output_type(),
                output_type
            )));
        }

        let id = OutputId(bump(&mut self.next_ids.output));
        self.outputs.push(GenerationOutput {
            id,
            model_id,
            prompt_id,
            content,
            output_type,
            created_at: now,
        });
        Ok(id)
    }

    pub fn record_feedback(
        &mut self,
        output_id: OutputId,
        score: FeedbackScore,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<FeedbackId, StoreError> {
        if !self.outputs.iter().any(|o| o.id == output_id) {
            return Err(StoreError::not_found("output", output_id.get()));
        }
        let id = FeedbackId(bump(&mut self.next_ids.feedback));
        self.feedback.push(Feedback {
            id,
            output_id,
            score,
            comment,
            created_at: now,
        });
        Ok(id)
    }

    pub fn update_prompt_text(
        &mut self,
        prompt_id: PromptId,
        template: PromptTemplate,
    ) -> Result<(), StoreError> {
        let prompt = self
            .prompts
            .iter_mut()
            .find(|p| p.id == prompt_id)
            .ok_or_else(|| StoreError::not_found("prompt", prompt_id.get()))?;
        prompt.template = template;
        Ok(())
    }

    pub fn add_model(
        &mut self,
        name: &str,
        produces_text: bool,
        produces_image: bool,
    ) -> Result<AiModel, StoreError> {
        let name = name.trim();
        if self.models.iter().any(|m| m.name == name) {
            return Err(StoreError::Conflict(format!("model {} already exists", name)));
        }
        let model = AiModel::new(
            ModelId(self.next_ids.model + 1),
            name,
            produces_text,
            produces_image,
        )?;
        bump(&mut self.next_ids.model);
        self.models.push(model.clone());
        Ok(model)
    }

    /// Cascades to the model's outputs and their feedback
    pub fn remove_model(&mut self, model_id: ModelId) -> Result<(), StoreError> {
        self.model(model_id)?;
        self.models.retain(|m| m.id != model_id);
        self.drop_outputs(|o| o.model_id == model_id);
        Ok(())
    }

    pub fn add_domain(&mut self, name: &str) -> Result<Domain, StoreError> {
        let name = name.trim();
        if self.domains.iter().any(|d| d.name.eq_ignore_ascii_case(name)) {
            return Err(StoreError::Conflict(format!("domain {} already exists", name)));
        }
        let domain = Domain::new(DomainId(self.next_ids.domain + 1), name)?;
        bump(&mut self.next_ids.domain);
        self.domains.push(domain.clone());
        Ok(domain)
    }

    /// Cascades to the domain's prompts, their outputs and feedback
    pub fn remove_domain(&mut self, domain_id: DomainId) -> Result<(), StoreError> {
        if domain_id.is_default() {
            return Err(DomainError::DefaultDomainProtected.into());
        }
        if !self.domains.iter().any(|d| d.id == domain_id) {
            return Err(StoreError::not_found("domain", domain_id.get()));
        }
        let removed: Vec<PromptId> = self
            .prompts
            .iter()
            .filter(|p| p.domain_id == domain_id)
            .map(|p| p.id)
            .collect();
        self.domains.retain(|d| d.id != domain_id);
        self.prompts.retain(|p| p.domain_id != domain_id);
        self.drop_outputs(|o| removed.contains(&o.prompt_id));
        Ok(())
    }

    pub fn add_prompt(
        &mut self,
        domain_id: DomainId,
        template: PromptTemplate,
        output_type: OutputType,
    ) -> Result<Prompt, StoreError> {
        if !self.domains.iter().any(|d| d.id == domain_id) {
            return Err(StoreError::not_found("domain", domain_id.get()));
        }
        let prompt = Prompt {
            id: PromptId(bump(&mut self.next_ids.prompt)),
            domain_id,
            template,
            output_type,
        };
        self.prompts.push(prompt.clone());
        Ok(prompt)
    }

    /// Cascades to the prompt's outputs and their feedback
    pub fn remove_prompt(&mut self, prompt_id: PromptId) -> Result<(), StoreError> {
        self.prompt(prompt_id)?;
        self.prompts.retain(|p| p.id != prompt_id);
        self.drop_outputs(|o| o.prompt_id == prompt_id);
        Ok(())
    }

    fn drop_outputs(&mut self, doomed: impl Fn(&GenerationOutput) -> bool) {
        let removed: Vec<OutputId> = self
            .outputs
            .iter()
            .filter(|o| doomed(o))
            .map(|o| o.id)
            .collect();
        self.outputs.retain(|o| !removed.contains(&o.id));
        self.feedback.retain(|f| !removed.contains(&f.output_id));
    }
}
