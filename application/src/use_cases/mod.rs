//! Use cases for the application layer

pub mod get_suggestion;
pub mod manage_catalog;
pub mod rewrite_prompt;
pub mod submit_feedback;
