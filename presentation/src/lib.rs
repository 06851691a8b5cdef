//! Presentation layer for x-studio
//!
//! This crate contains CLI definitions, output formatters and progress
//! reporting.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, DomainAction, ModelAction, PromptAction, SuggestArgs};
pub use config::{OutputConfig, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use output::json::JsonFormatter;
pub use progress::reporter::{ProgressReporter, Spinner};
