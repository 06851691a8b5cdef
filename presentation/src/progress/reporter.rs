//! Progress reporting while a provider call is in flight

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Starts spinners for long-running commands
///
/// Disabled reporters hand out hidden spinners so callers never branch.
pub struct ProgressReporter {
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Start a spinner showing `message`
    pub fn start(&self, message: impl Into<String>) -> Spinner {
        let bar = if self.enabled {
            let bar = ProgressBar::new_spinner();
            bar.set_style(Self::spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(message.into());
        Spinner { bar }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// One running spinner; cleared when dropped without finishing
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    pub fn succeed(self, message: impl AsRef<str>) {
        self.bar
            .finish_with_message(format!("{} {}", "v".green(), message.as_ref()));
    }

    pub fn fail(self, message: impl AsRef<str>) {
        self.bar
            .finish_with_message(format!("{} {}", "x".red(), message.as_ref()));
    }

    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_reporter_is_hidden() {
        let reporter = ProgressReporter::new(false);
        let spinner = reporter.start("Generating");
        assert!(spinner.bar.is_hidden());
        spinner.succeed("done");
    }

    #[test]
    fn test_drop_finishes_spinner() {
        let reporter = ProgressReporter::new(false);
        let spinner = reporter.start("Rewriting");
        let bar = spinner.bar.clone();
        drop(spinner);
        assert!(bar.is_finished());
    }
}
