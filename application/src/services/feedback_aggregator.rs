//! Feedback aggregation
//!
//! Turns the append-only vote log into per-pair scores the selection policy
//! can rank.

use crate::ports::suggestion_store::{StoreError, SuggestionStore};
use futures::future::try_join_all;
use std::sync::Arc;
use studio_domain::{
    Candidate, CandidatePool, DomainId, FeedbackEntry, ModelId, OutputType, PromptId,
    ScoredCandidate, aggregate_score,
};
use tracing::debug;

/// Read-only view over the feedback log
#[derive(Clone)]
pub struct FeedbackAggregator {
    store: Arc<dyn SuggestionStore>,
}

impl FeedbackAggregator {
    pub fn new(store: Arc<dyn SuggestionStore>) -> Self {
        Self { store }
    }

    /// Sum of signed votes on every output of the pair; 0 when none
    pub async fn score(&self, model_id: ModelId, prompt_id: PromptId) -> Result<i64, StoreError> {
        let history = self.store.feedback_history(model_id, prompt_id).await?;
        Ok(aggregate_score(history.iter().map(|e| e.score)))
    }

    /// Every eligible (model, prompt) pair for the request scope
    pub async fn candidates(
        &self,
        output_type: OutputType,
        domain_id: Option<DomainId>,
    ) -> Result<Vec<Candidate>, StoreError> {
        self.store.list_candidates(output_type, domain_id).await
    }

    /// Eligible pairs annotated with score, vote count and last use
    pub async fn scored_candidates(
        &self,
        output_type: OutputType,
        domain_id: Option<DomainId>,
    ) -> Result<CandidatePool, StoreError> {
        let candidates = self.candidates(output_type, domain_id).await?;
        let scored = try_join_all(candidates.into_iter().map(|c| self.annotate(c))).await?;
        debug!(
            "Scored {} {} candidate(s){}",
            scored.len(),
            output_type,
            domain_id
                .map(|d| format!(" in domain {}", d))
                .unwrap_or_default()
        );
        Ok(CandidatePool::new(output_type, domain_id, scored))
    }

    /// Raw vote history of one pair, oldest first
    pub async fn history(
        &self,
        model_id: ModelId,
        prompt_id: PromptId,
    ) -> Result<Vec<FeedbackEntry>, StoreError> {
        self.store.feedback_history(model_id, prompt_id).await
    }

    /// Vote history of a prompt across every model that has used it
    pub async fn prompt_history(&self, prompt_id: PromptId) -> Result<Vec<FeedbackEntry>, StoreError> {
        let models = self.store.list_models().await?;
        let histories =
            try_join_all(models.iter().map(|m| self.history(m.id, prompt_id))).await?;
        let mut entries: Vec<FeedbackEntry> = histories.into_iter().flatten().collect();
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    async fn annotate(&self, candidate: Candidate) -> Result<ScoredCandidate, StoreError> {
        let (model_id, prompt_id) = candidate.sort_key();
        let (history, last_used) = tokio::try_join!(
            self.store.feedback_history(model_id, prompt_id),
            self.store.last_used(model_id, prompt_id),
        )?;
        let score = aggregate_score(history.iter().map(|e| e.score));
        Ok(ScoredCandidate::new(candidate, score)
            .with_feedback_count(history.len())
            .with_last_used(last_used))
    }
}
