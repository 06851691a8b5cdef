//! Prompt templates and the meta-prompts built around them.

pub mod meta;
pub mod template;

pub use meta::{FeedbackSample, MetaPrompt, extract_revised_template, sample_history};
pub use template::{CONTEXT_PLACEHOLDER, PromptTemplate};
