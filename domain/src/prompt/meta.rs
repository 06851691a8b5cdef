//! Meta-prompts: prompts about prompts and drafts.
//!
//! Used to ask a text model to improve a template from its feedback history,
//! and to shorten a draft that came back over the length limit.

use super::template::{CONTEXT_PLACEHOLDER, PromptTemplate};
use crate::catalog::{FeedbackEntry, FeedbackScore, OutputContent, OutputId};
use crate::content::cleaner::{strip_code_fences, strip_wrapping_quotes};
use crate::core::error::DomainError;
use crate::core::string::truncate;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Longest excerpt of a past output embedded in a rewrite meta-prompt (bytes)
const SAMPLE_EXCERPT_BYTES: usize = 400;

/// A past output with the net sign of all votes it received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSample {
    pub output_id: OutputId,
    pub content: OutputContent,
    pub verdict: FeedbackScore,
    pub votes: usize,
    pub last_vote_at: DateTime<Utc>,
}

/// Pick a representative sample of a pair's history.
///
/// Votes are folded per output into a net sign (outputs whose votes cancel
/// out are skipped). Liked and disliked outputs are interleaved, newest
/// first, so a sample never shows one side only when both exist.
pub fn sample_history(entries: &[FeedbackEntry], sample_size: usize) -> Vec<FeedbackSample> {
    let mut per_output: HashMap<OutputId, (OutputContent, i64, usize, DateTime<Utc>)> =
        HashMap::new();
    for entry in entries {
        let slot = per_output
            .entry(entry.output_id)
            .or_insert_with(|| (entry.content.clone(), 0, 0, entry.created_at));
        slot.1 += entry.score.value();
        slot.2 += 1;
        if entry.created_at > slot.3 {
            slot.3 = entry.created_at;
        }
    }

    let mut liked = Vec::new();
    let mut disliked = Vec::new();
    for (output_id, (content, net, votes, last_vote_at)) in per_output {
        let verdict = match net {
            n if n > 0 => FeedbackScore::Up,
            n if n < 0 => FeedbackScore::Down,
            _ => continue,
        };
        let sample = FeedbackSample {
            output_id,
            content,
            verdict,
            votes,
            last_vote_at,
        };
        if verdict.is_positive() {
            liked.push(sample);
        } else {
            disliked.push(sample);
        }
    }

    let newest_first = |a: &FeedbackSample, b: &FeedbackSample| {
        b.last_vote_at
            .cmp(&a.last_vote_at)
            .then(a.output_id.cmp(&b.output_id))
    };
    liked.sort_by(newest_first);
    disliked.sort_by(newest_first);

    let mut sample = Vec::with_capacity(sample_size.min(liked.len() + disliked.len()));
    let mut liked = liked.into_iter();
    let mut disliked = disliked.into_iter();
    while sample.len() < sample_size {
        let next_disliked = disliked.next();
        let next_liked = liked.next();
        if next_disliked.is_none() && next_liked.is_none() {
            break;
        }
        for item in [next_disliked, next_liked].into_iter().flatten() {
            if sample.len() < sample_size {
                sample.push(item);
            }
        }
    }
    sample
}

/// Builders for the meta-prompts sent to text models
pub struct MetaPrompt;

impl MetaPrompt {
    /// Ask a model to rewrite `template` in light of `samples`
    pub fn rewrite(template: &PromptTemplate, samples: &[FeedbackSample]) -> String {
        let mut prompt = format!(
            r#"You maintain prompt templates that generate short social media posts.
Below is a template and examples of what it produced, each marked LIKED or DISLIKED by the audience.

Current template:
<<<
{}
>>>
"#,
            template.as_str()
        );

        if samples.is_empty() {
            prompt.push_str("\nNo rated outputs yet.\n");
        } else {
            prompt.push_str("\nRated outputs:\n");
            for (i, sample) in samples.iter().enumerate() {
                let label = if sample.verdict.is_positive() {
                    "LIKED"
                } else {
                    "DISLIKED"
                };
                prompt.push_str(&format!(
                    "\n{}. [{}] {}\n",
                    i + 1,
                    label,
                    truncate(&sample.content.describe(), SAMPLE_EXCERPT_BYTES)
                ));
            }
        }

        prompt.push_str(&format!(
            r#"
Write an improved template that keeps what was liked and avoids what was disliked.
Rules:
- Keep the literal placeholder {} at least once; it is replaced with user context.
- Reply with the template text only, no explanation, no quotes, no code fences."#,
            CONTEXT_PLACEHOLDER
        ));

        prompt
    }

    /// Ask a model to shorten a draft to `max_chars`
    pub fn abbreviate(draft: &str, max_chars: usize) -> String {
        format!(
            "Abbreviate this draft tweet to {} characters or less: {}",
            max_chars, draft
        )
    }
}

/// Pull the revised template out of a rewrite response.
///
/// Fails with [`DomainError::MissingPlaceholder`] when the model dropped the
/// placeholder, so the caller keeps the original prompt.
pub fn extract_revised_template(raw: &str) -> Result<PromptTemplate, DomainError> {
    let unfenced = strip_code_fences(raw.trim());
    let unquoted = strip_wrapping_quotes(unfenced.trim());
    PromptTemplate::parse(unquoted.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(output: u64, score: FeedbackScore, minute: u32, text: &str) -> FeedbackEntry {
        FeedbackEntry {
            output_id: OutputId(output),
            content: OutputContent::Text(text.to_string()),
            score,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_sample_folds_votes_per_output() {
        let entries = vec![
            entry(1, FeedbackScore::Up, 0, "a"),
            entry(1, FeedbackScore::Up, 1, "a"),
            entry(1, FeedbackScore::Down, 2, "a"),
            entry(2, FeedbackScore::Up, 3, "b"),
            entry(2, FeedbackScore::Down, 4, "b"),
        ];
        let sample = sample_history(&entries, 10);
        // output 2 nets to zero and is skipped
        assert_eq!(sample.len(), 1);
        assert_eq!(sample[0].output_id, OutputId(1));
        assert_eq!(sample[0].verdict, FeedbackScore::Up);
        assert_eq!(sample[0].votes, 3);
    }

    #[test]
    fn test_sample_interleaves_and_limits() {
        let mut entries = Vec::new();
        for i in 0..5 {
            entries.push(entry(i, FeedbackScore::Down, i as u32, "bad"));
        }
        entries.push(entry(10, FeedbackScore::Up, 30, "good"));
        let sample = sample_history(&entries, 4);
        assert_eq!(sample.len(), 4);
        assert_eq!(
            sample.iter().filter(|s| s.verdict.is_positive()).count(),
            1
        );
        // newest disliked output comes first
        assert_eq!(sample[0].output_id, OutputId(4));
    }

    #[test]
    fn test_sample_empty_history() {
        assert!(sample_history(&[], 5).is_empty());
        let entries = vec![entry(1, FeedbackScore::Up, 0, "x")];
        assert!(sample_history(&entries, 0).is_empty());
    }

    #[test]
    fn test_rewrite_prompt_embeds_template_and_labels() {
        let template = PromptTemplate::parse("Write about {context}").unwrap();
        let sample = sample_history(&[entry(1, FeedbackScore::Down, 0, "boring post")], 5);
        let prompt = MetaPrompt::rewrite(&template, &sample);
        assert!(prompt.contains("Write about {context}"));
        assert!(prompt.contains("[DISLIKED] boring post"));
        assert!(prompt.contains("Keep the literal placeholder {context} at least once;"));
    }

    #[test]
    fn test_abbreviate_prompt() {
        assert_eq!(
            MetaPrompt::abbreviate("long draft", 280),
            "Abbreviate this draft tweet to 280 characters or less: long draft"
        );
    }

    #[test]
    fn test_extract_strips_fences_and_quotes() {
        let raw = "```\n\"Write a haunting tweet about {context}\"\n```";
        let template = extract_revised_template(raw).unwrap();
        assert_eq!(template.as_str(), "Write a haunting tweet about {context}");
    }

    #[test]
    fn test_extract_rejects_missing_placeholder() {
        assert_eq!(
            extract_revised_template("Write a haunting tweet"),
            Err(DomainError::MissingPlaceholder)
        );
    }
}
