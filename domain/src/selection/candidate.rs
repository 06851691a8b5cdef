//! Scored candidates and the pool they are drawn from

use crate::catalog::{Candidate, DomainId, FeedbackScore, OutputType};
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sum of signed votes. An empty history scores 0 (cold start).
pub fn aggregate_score<I>(scores: I) -> i64
where
    I: IntoIterator<Item = FeedbackScore>,
{
    scores.into_iter().map(FeedbackScore::value).sum()
}

/// A candidate annotated with what the feedback history says about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: i64,
    pub feedback_count: usize,
    /// Creation time of the newest output this pair produced
    pub last_used: Option<DateTime<Utc>>,
}

impl ScoredCandidate {
    pub fn new(candidate: Candidate, score: i64) -> Self {
        Self {
            candidate,
            score,
            feedback_count: 0,
            last_used: None,
        }
    }

    pub fn with_feedback_count(mut self, count: usize) -> Self {
        self.feedback_count = count;
        self
    }

    pub fn with_last_used(mut self, last_used: Option<DateTime<Utc>>) -> Self {
        self.last_used = last_used;
        self
    }

    /// True when no vote has ever been cast for this pair
    pub fn is_cold_start(&self) -> bool {
        self.feedback_count == 0
    }
}

/// Every eligible candidate for one request, plus the request's scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePool {
    pub output_type: OutputType,
    pub domain_id: Option<DomainId>,
    pub candidates: Vec<ScoredCandidate>,
}

impl CandidatePool {
    pub fn new(
        output_type: OutputType,
        domain_id: Option<DomainId>,
        candidates: Vec<ScoredCandidate>,
    ) -> Self {
        Self {
            output_type,
            domain_id,
            candidates,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Fail with [`DomainError::NoCandidates`] if nothing is eligible
    pub fn ensure_non_empty(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::NoCandidates {
                output_type: self.output_type,
                domain_id: self.domain_id,
                candidate_count: 0,
            });
        }
        Ok(())
    }
}
