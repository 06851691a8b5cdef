//! Console output formatter

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use studio_application::{PairHistory, RewriteOutcome, Suggestion};
use studio_domain::core::string::truncate;
use studio_domain::{AiModel, Domain, FeedbackId, FeedbackScore, OutputContent, OutputId, Prompt};

/// Width of template and content excerpts in listings
const EXCERPT_WIDTH: usize = 72;

/// Formats results for human reading
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn score(score: i64) -> String {
        let text = format!("{:+}", score);
        match score.signum() {
            1 => text.green().to_string(),
            -1 => text.red().to_string(),
            _ => text.dimmed().to_string(),
        }
    }

    fn content(content: &OutputContent) -> String {
        match content {
            OutputContent::Text(text) => text.clone(),
            OutputContent::ImageUrl(url) => format!("{} {}", "Image:".cyan().bold(), url),
            OutputContent::ImageBytes(bytes) => {
                format!("{} {} bytes (inline)", "Image:".cyan().bold(), bytes.len())
            }
        }
    }

    /// Collapse newlines so an excerpt fits on one row
    fn excerpt(text: &str) -> String {
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
        truncate(&flat, EXCERPT_WIDTH)
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn suggestion(&self, suggestion: &Suggestion) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Suggestion"));
        output.push_str("\n\n");
        output.push_str(&Self::content(&suggestion.content));
        output.push_str("\n\n");

        output.push_str(&format!(
            "{} {}   {} {} (score {})\n",
            "Model:".cyan().bold(),
            suggestion.model.name,
            "Prompt:".cyan().bold(),
            suggestion.prompt.id,
            Self::score(suggestion.score)
        ));
        if suggestion.attempts > 1 {
            output.push_str(&format!(
                "{}\n",
                format!("Generated after {} attempts", suggestion.attempts).dimmed()
            ));
        }
        output.push_str(&format!(
            "{} x-studio feedback {} up|down\n",
            "Vote:".dimmed(),
            suggestion.output_id
        ));

        output
    }

    fn feedback(&self, feedback_id: FeedbackId, output_id: OutputId, score: FeedbackScore) -> String {
        let symbol = if score.is_positive() {
            score.symbol().green()
        } else {
            score.symbol().red()
        };
        format!(
            "{} Recorded {} for output {} (feedback {})",
            "v".green(),
            symbol,
            output_id,
            feedback_id
        )
    }

    fn rewrite(&self, outcome: &RewriteOutcome) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(&format!("Prompt {} rewritten", outcome.prompt_id)));
        output.push('\n');
        output.push_str(&format!("\n{}\n", "Before:".yellow().bold()));
        output.push_str(&Self::indent(&outcome.previous, "  "));
        output.push_str(&format!("\n\n{}\n", "After:".green().bold()));
        output.push_str(&Self::indent(&outcome.revised, "  "));
        output.push_str(&format!(
            "\n\n{}\n",
            format!(
                "Rewritten by {} from {} sampled outputs",
                outcome.rewriter, outcome.samples
            )
            .dimmed()
        ));
        output
    }

    fn models(&self, models: &[AiModel]) -> String {
        if models.is_empty() {
            return "No models registered.".dimmed().to_string();
        }
        let mut output = format!("{:>4}  {:<11} {}\n", "ID".bold(), "OUTPUT".bold(), "NAME".bold());
        for model in models {
            output.push_str(&format!(
                "{:>4}  {:<11} {}\n",
                model.id.get(),
                model.capability_label(),
                model.name
            ));
        }
        output
    }

    fn domains(&self, domains: &[Domain]) -> String {
        if domains.is_empty() {
            return "No domains.".dimmed().to_string();
        }
        let mut output = format!("{:>4}  {}\n", "ID".bold(), "NAME".bold());
        for domain in domains {
            let marker = if domain.is_default() { " (default)" } else { "" };
            output.push_str(&format!("{:>4}  {}{}\n", domain.id.get(), domain.name, marker.dimmed()));
        }
        output
    }

    fn prompts(&self, prompts: &[Prompt]) -> String {
        if prompts.is_empty() {
            return "No prompts.".dimmed().to_string();
        }
        let mut output = format!(
            "{:>4}  {:>6}  {:<5}  {}\n",
            "ID".bold(),
            "DOMAIN".bold(),
            "TYPE".bold(),
            "TEMPLATE".bold()
        );
        for prompt in prompts {
            output.push_str(&format!(
                "{:>4}  {:>6}  {:<5}  {}\n",
                prompt.id.get(),
                prompt.domain_id.get(),
                prompt.output_type.as_str(),
                Self::excerpt(prompt.text())
            ));
        }
        output
    }

    fn history(&self, history: &PairHistory) -> String {
        let mut output = format!(
            "{} model {} / prompt {}: score {} from {} votes\n",
            "History:".cyan().bold(),
            history.model_id,
            history.prompt_id,
            Self::score(history.score),
            history.entries.len()
        );
        for entry in &history.entries {
            let vote = if entry.score.is_positive() {
                entry.score.symbol().green()
            } else {
                entry.score.symbol().red()
            };
            output.push_str(&format!(
                "  {} {} #{} {}\n",
                entry.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                vote,
                entry.output_id,
                Self::excerpt(&entry.content.describe())
            ));
        }
        output
    }

    fn done(&self, message: &str) -> String {
        format!("{} {}", "v".green(), message)
    }
}
