//! Generated outputs and the feedback attached to them

use super::entities::OutputType;
use super::ids::{FeedbackId, ModelId, OutputId, PromptId};
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content produced by one generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OutputContent {
    Text(String),
    ImageUrl(String),
    ImageBytes(Vec<u8>),
}

impl OutputContent {
    pub fn output_type(&self) -> OutputType {
        match self {
            OutputContent::Text(_) => OutputType::Text,
            OutputContent::ImageUrl(_) | OutputContent::ImageBytes(_) => OutputType::Image,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OutputContent::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Human-readable one-line description, used in meta-prompts and listings
    pub fn describe(&self) -> String {
        match self {
            OutputContent::Text(text) => text.clone(),
            OutputContent::ImageUrl(url) => format!("[image] {}", url),
            OutputContent::ImageBytes(bytes) => format!("[image] {} bytes", bytes.len()),
        }
    }
}

/// An immutable record of one generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub id: OutputId,
    pub model_id: ModelId,
    pub prompt_id: PromptId,
    pub content: OutputContent,
    pub output_type: OutputType,
    pub created_at: DateTime<Utc>,
}

/// Signed user judgment on one output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum FeedbackScore {
    Up,
    Down,
}

impl FeedbackScore {
    pub fn value(self) -> i64 {
        match self {
            FeedbackScore::Up => 1,
            FeedbackScore::Down => -1,
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, FeedbackScore::Up)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            FeedbackScore::Up => "+1",
            FeedbackScore::Down => "-1",
        }
    }
}

impl From<FeedbackScore> for i8 {
    fn from(score: FeedbackScore) -> Self {
        score.value() as i8
    }
}

impl TryFrom<i8> for FeedbackScore {
    type Error = DomainError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        FeedbackScore::try_from(value as i64)
    }
}

impl TryFrom<i64> for FeedbackScore {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FeedbackScore::Up),
            -1 => Ok(FeedbackScore::Down),
            other => Err(DomainError::InvalidScore(other.to_string())),
        }
    }
}

impl std::str::FromStr for FeedbackScore {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "+1" | "up" | "like" => Ok(FeedbackScore::Up),
            "-1" | "down" | "dislike" => Ok(FeedbackScore::Down),
            other => Err(DomainError::InvalidScore(other.to_string())),
        }
    }
}

impl std::fmt::Display for FeedbackScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One feedback row. Append-only: an output may collect any number of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub output_id: OutputId,
    pub score: FeedbackScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A past output of one (model, prompt) pair joined with one of its votes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub output_id: OutputId,
    pub content: OutputContent,
    pub score: FeedbackScore,
    pub created_at: DateTime<Utc>,
}
