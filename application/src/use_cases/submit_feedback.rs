//! Submit Feedback use case

use crate::error::EngineError;
use crate::ports::event_logger::{EngineEvent, EventLogger, NoEventLogger};
use crate::ports::suggestion_store::SuggestionStore;
use std::sync::Arc;
use studio_domain::{FeedbackId, FeedbackScore, OutputId};
use tracing::info;

/// Use case for recording a vote on a stored output
pub struct SubmitFeedbackUseCase {
    store: Arc<dyn SuggestionStore>,
    logger: Arc<dyn EventLogger>,
}

impl SubmitFeedbackUseCase {
    pub fn new(store: Arc<dyn SuggestionStore>) -> Self {
        Self {
            store,
            logger: Arc::new(NoEventLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Append one vote. Blank comments are dropped.
    pub async fn execute(
        &self,
        output_id: OutputId,
        score: FeedbackScore,
        comment: Option<String>,
    ) -> Result<FeedbackId, EngineError> {
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let feedback_id = self
            .store
            .record_feedback(output_id, score, comment.clone())
            .await?;

        info!("Recorded {} on output {}", score, output_id);
        self.logger.log(EngineEvent::new(
            "feedback_recorded",
            serde_json::json!({
                "feedback_id": feedback_id,
                "output_id": output_id,
                "score": score,
                "comment": comment,
            }),
        ));

        Ok(feedback_id)
    }

    /// Same as [`execute`](Self::execute) for a raw signed value
    pub async fn execute_raw(
        &self,
        output_id: OutputId,
        score: i64,
        comment: Option<String>,
    ) -> Result<FeedbackId, EngineError> {
        let score = FeedbackScore::try_from(score)?;
        self.execute(output_id, score, comment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{MockStore, RecordingLogger};
    use studio_domain::{DomainId, OutputType};

    fn store_with_output() -> (Arc<MockStore>, OutputId) {
        let store = Arc::new(MockStore::new());
        let model = store.model("writer", true, false);
        let prompt = store.prompt(DomainId::DEFAULT, "About {context}", OutputType::Text);
        let output = store.output_with_votes(model.id, prompt.id, "hello", &[]);
        (store, output)
    }

    #[tokio::test]
    async fn test_votes_are_appended() {
        let (store, output) = store_with_output();
        let use_case = SubmitFeedbackUseCase::new(store.clone());

        let first = use_case.execute(output, FeedbackScore::Up, None).await.unwrap();
        let second = use_case
            .execute(output, FeedbackScore::Down, Some("too long".into()))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(store.feedback_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_output_is_persistence_error() {
        let (store, _) = store_with_output();
        let err = SubmitFeedbackUseCase::new(store.clone())
            .execute(OutputId(9_999), FeedbackScore::Up, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(store.feedback_count(), 0);
    }

    #[tokio::test]
    async fn test_raw_score_is_validated() {
        let (store, output) = store_with_output();
        let use_case = SubmitFeedbackUseCase::new(store.clone());

        let err = use_case.execute_raw(output, 0, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(use_case.execute_raw(output, -1, None).await.is_ok());
        assert_eq!(store.feedback_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_comment_is_dropped_from_event() {
        let (store, output) = store_with_output();
        let logger = Arc::new(RecordingLogger::default());
        SubmitFeedbackUseCase::new(store)
            .with_logger(logger.clone())
            .execute(output, FeedbackScore::Up, Some("   ".into()))
            .await
            .unwrap();

        let events = logger.events();
        assert_eq!(events[0].0, "feedback_recorded");
        assert_eq!(events[0].1["score"], 1);
        assert!(events[0].1["comment"].is_null());
    }
}
