//! Selection mode value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How a candidate is picked from the scored pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Uniform draw, ignores scores
    #[default]
    Random,
    /// Softmax over scores: better pairs win more often, none is starved
    Weighted,
    /// Deterministic argmax with a fixed tie-break
    Highest,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Random => "random",
            SelectionMode::Weighted => "weighted",
            SelectionMode::Highest => "highest",
        }
    }

    /// Whether this mode reads feedback scores at all
    pub fn uses_scores(&self) -> bool {
        !matches!(self, SelectionMode::Random)
    }
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SelectionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(SelectionMode::Random),
            "weighted" | "softmax" => Ok(SelectionMode::Weighted),
            "highest" | "best" => Ok(SelectionMode::Highest),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}
