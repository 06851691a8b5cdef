//! Output formatter trait

use studio_application::{PairHistory, RewriteOutcome, Suggestion};
use studio_domain::{AiModel, Domain, FeedbackId, FeedbackScore, OutputId, Prompt};

/// Renders command results for the terminal
pub trait OutputFormatter {
    fn suggestion(&self, suggestion: &Suggestion) -> String;

    fn feedback(&self, feedback_id: FeedbackId, output_id: OutputId, score: FeedbackScore) -> String;

    fn rewrite(&self, outcome: &RewriteOutcome) -> String;

    fn models(&self, models: &[AiModel]) -> String;

    fn domains(&self, domains: &[Domain]) -> String;

    fn prompts(&self, prompts: &[Prompt]) -> String;

    fn history(&self, history: &PairHistory) -> String;

    /// Confirmation for add/remove commands
    fn done(&self, message: &str) -> String;
}
