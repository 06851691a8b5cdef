//! Presentation-level configuration
//!
//! How results are rendered, derived from the global CLI flags.

use crate::cli::commands::Cli;
use crate::output::console::ConsoleFormatter;
use crate::output::formatter::OutputFormatter;
use crate::output::json::JsonFormatter;
use crate::progress::reporter::ProgressReporter;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Colored human-readable text
    #[default]
    Console,
    /// Pretty-printed JSON
    Json,
}

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Show spinners while provider calls run
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Spinners are off for `--quiet` and for JSON, which must stay parseable
    pub fn from_cli(cli: &Cli) -> Self {
        let format = if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Console
        };
        Self {
            format,
            show_progress: !cli.quiet && format == OutputFormat::Console,
        }
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        match self.format {
            OutputFormat::Console => Box::new(ConsoleFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }

    pub fn progress(&self) -> ProgressReporter {
        ProgressReporter::new(self.show_progress)
    }
}
