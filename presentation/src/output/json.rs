//! JSON output for scripting (`--json`)

use crate::output::formatter::OutputFormatter;
use serde::Serialize;
use studio_application::{PairHistory, RewriteOutcome, Suggestion};
use studio_domain::{AiModel, Domain, FeedbackId, FeedbackScore, OutputId, Prompt};

/// Formats results as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn suggestion(&self, suggestion: &Suggestion) -> String {
        Self::render(suggestion)
    }

    fn feedback(&self, feedback_id: FeedbackId, output_id: OutputId, score: FeedbackScore) -> String {
        Self::render(&serde_json::json!({
            "feedback_id": feedback_id,
            "output_id": output_id,
            "score": score,
        }))
    }

    fn rewrite(&self, outcome: &RewriteOutcome) -> String {
        Self::render(outcome)
    }

    fn models(&self, models: &[AiModel]) -> String {
        Self::render(models)
    }

    fn domains(&self, domains: &[Domain]) -> String {
        Self::render(domains)
    }

    fn prompts(&self, prompts: &[Prompt]) -> String {
        Self::render(prompts)
    }

    fn history(&self, history: &PairHistory) -> String {
        Self::render(history)
    }

    fn done(&self, message: &str) -> String {
        Self::render(&serde_json::json!({ "ok": true, "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_domain::{DomainId, ModelId};

    #[test]
    fn test_feedback_json() {
        let json = JsonFormatter.feedback(FeedbackId(3), OutputId(9), FeedbackScore::Down);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["feedback_id"], 3);
        assert_eq!(value["output_id"], 9);
        assert_eq!(value["score"], -1);
    }

    #[test]
    fn test_lists_are_arrays() {
        let models = vec![AiModel::new(ModelId(1), "dall-e-3", false, true).unwrap()];
        let value: serde_json::Value = serde_json::from_str(&JsonFormatter.models(&models)).unwrap();
        assert_eq!(value[0]["name"], "dall-e-3");

        let domains = vec![Domain::new(DomainId::DEFAULT, "General").unwrap()];
        let value: serde_json::Value = serde_json::from_str(&JsonFormatter.domains(&domains)).unwrap();
        assert_eq!(value[0]["id"], 1);
    }
}
