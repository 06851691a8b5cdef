//! Catalog entities: models, domains and prompts

use super::ids::{DomainId, ModelId, PromptId};
use crate::core::error::DomainError;
use crate::prompt::template::PromptTemplate;
use serde::{Deserialize, Serialize};

/// Kind of content a generation produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    Text,
    Image,
}

impl OutputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Text => "text",
            OutputType::Image => "image",
        }
    }
}

impl std::fmt::Display for OutputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OutputType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputType::Text),
            "image" => Ok(OutputType::Image),
            other => Err(DomainError::InvalidOutputType(other.to_string())),
        }
    }
}

/// An AI model reachable through the generation provider
///
/// `name` is the provider routing name (e.g. `openrouter/openai/o3-mini`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiModel {
    pub id: ModelId,
    pub name: String,
    pub produces_text: bool,
    pub produces_image: bool,
}

impl AiModel {
    pub fn new(
        id: ModelId,
        name: impl Into<String>,
        produces_text: bool,
        produces_image: bool,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyField("model name"));
        }
        if !produces_text && !produces_image {
            return Err(DomainError::NoCapabilities(name));
        }
        Ok(Self {
            id,
            name,
            produces_text,
            produces_image,
        })
    }

    /// Check whether this model can produce the given output type
    pub fn supports(&self, output_type: OutputType) -> bool {
        match output_type {
            OutputType::Text => self.produces_text,
            OutputType::Image => self.produces_image,
        }
    }

    /// Short capability label for listings ("text", "image", "text+image")
    pub fn capability_label(&self) -> &'static str {
        match (self.produces_text, self.produces_image) {
            (true, true) => "text+image",
            (true, false) => "text",
            (false, true) => "image",
            (false, false) => "none",
        }
    }
}

/// A named grouping of prompts by subject area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
}

impl Domain {
    pub fn new(id: DomainId, name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyField("domain name"));
        }
        Ok(Self { id, name })
    }

    pub fn is_default(&self) -> bool {
        self.id.is_default()
    }
}

/// A reusable template scoped to one domain and one output type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: PromptId,
    pub domain_id: DomainId,
    pub template: PromptTemplate,
    pub output_type: OutputType,
}

impl Prompt {
    pub fn new(
        id: PromptId,
        domain_id: DomainId,
        template: impl Into<String>,
        output_type: OutputType,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            domain_id,
            template: PromptTemplate::parse(template)?,
            output_type,
        })
    }

    pub fn text(&self) -> &str {
        self.template.as_str()
    }
}

/// A (model, prompt) pair eligible for generating one output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub model: AiModel,
    pub prompt: Prompt,
}

impl Candidate {
    /// Pair a model with a prompt, checking that they agree on output type
    pub fn new(model: AiModel, prompt: Prompt) -> Result<Self, DomainError> {
        if !model.supports(prompt.output_type) {
            return Err(DomainError::TypeMismatch {
                model: model.name,
                output_type: prompt.output_type,
            });
        }
        Ok(Self { model, prompt })
    }

    pub fn output_type(&self) -> OutputType {
        self.prompt.output_type
    }

    /// Stable ordering key: lowest model id, then lowest prompt id
    pub fn sort_key(&self) -> (ModelId, PromptId) {
        (self.model.id, self.prompt.id)
    }
}
