//! Prompt template value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The slot every template must carry; replaced with caller context on render
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// A validated prompt template (Value Object)
///
/// Construction fails unless the text contains [`CONTEXT_PLACEHOLDER`], so a
/// stored prompt can always be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Validate and wrap template text
    pub fn parse(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyField("prompt template"));
        }
        if !text.contains(CONTEXT_PLACEHOLDER) {
            return Err(DomainError::MissingPlaceholder);
        }
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Substitute every placeholder occurrence with `context` (trimmed).
    pub fn render(&self, context: Option<&str>) -> String {
        self.text
            .replace(CONTEXT_PLACEHOLDER, context.map(str::trim).unwrap_or(""))
    }
}

impl std::fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl TryFrom<String> for PromptTemplate {
    type Error = DomainError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        PromptTemplate::parse(text)
    }
}

impl From<PromptTemplate> for String {
    fn from(template: PromptTemplate) -> Self {
        template.text
    }
}
