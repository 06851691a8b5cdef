//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing keys fall back to defaults.

mod engine;
mod providers;
mod storage;
mod validation;

pub use engine::{FileContentConfig, FileGenerationConfig, FileRewriteConfig, FileSelectionConfig};
pub use providers::FileProvidersConfig;
pub use storage::{FileLoggingConfig, FileStorageConfig, StorageBackend};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use studio_application::{
    ContentLimits, EngineConfig, RetryPolicy, RewriteParams, SelectionParams,
};
use studio_domain::{DomainError, ImageConstraints, SelectionMode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Candidate selection
    pub selection: FileSelectionConfig,
    /// Retry, timeout and abbreviation settings
    pub generation: FileGenerationConfig,
    /// Content limits
    pub content: FileContentConfig,
    /// Prompt rewriting
    pub rewrite: FileRewriteConfig,
    /// Generation provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Store backend
    pub storage: FileStorageConfig,
    /// Structured event log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Selection
        let temperature = self.selection.temperature;
        if !temperature.is_finite() || temperature <= 0.0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NonPositiveTemperature,
                format!(
                    "selection.temperature must be a positive number, got {}",
                    temperature
                ),
            ));
        }
        if self.parse_default_mode().is_err() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownSelectionMode {
                    value: self.selection.default_mode.clone(),
                },
                format!(
                    "selection.default_mode: unknown value '{}' (expected random, weighted or highest)",
                    self.selection.default_mode
                ),
            ));
        }

        // 2. Generation
        let generation = &self.generation;
        if generation.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroAttempts,
                "generation.max_attempts must be at least 1",
            ));
        }
        if generation.initial_backoff_ms > generation.max_backoff_ms {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::BackoffInversion,
                format!(
                    "generation.initial_backoff_ms ({}) exceeds generation.max_backoff_ms ({})",
                    generation.initial_backoff_ms, generation.max_backoff_ms
                ),
            ));
        }
        for (field, value) in [
            ("generation.call_timeout_secs", generation.call_timeout_secs),
            ("generation.deadline_secs", generation.deadline_secs),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroDuration { field },
                    format!("{} must be greater than zero", field),
                ));
            }
        }
        if generation.deadline_secs > 0 && generation.deadline_secs < generation.call_timeout_secs
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DeadlineShorterThanCall,
                format!(
                    "generation.deadline_secs ({}) is shorter than generation.call_timeout_secs ({}); attempts will be cut at the deadline",
                    generation.deadline_secs, generation.call_timeout_secs
                ),
            ));
        }

        // 3. Content
        if self.content.max_chars == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroMaxChars,
                "content.max_chars must be greater than zero",
            ));
        }
        if self.content.image_max_bytes == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroImageBytes,
                "content.image_max_bytes must be greater than zero",
            ));
        }
        let (formats, unknown) = self.content.parse_image_formats();
        for value in unknown {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownImageFormat {
                    value: value.clone(),
                },
                format!("content.image_formats: unknown format '{}', ignored", value),
            ));
        }
        if formats.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoImageFormats,
                "content.image_formats must name at least one of png, jpeg, gif, webp",
            ));
        }

        // 4. Rewrite
        if self.rewrite.sample_size == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroSampleSize,
                "rewrite.sample_size is 0; prompts will be rewritten without examples",
            ));
        }
        if let Some(model) = &self.rewrite.model
            && model.trim().is_empty()
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyModelName {
                    field: "rewrite.model",
                },
                "rewrite.model is empty; the first text model will be used",
            ));
        }

        issues
    }

    pub fn parse_default_mode(&self) -> Result<SelectionMode, DomainError> {
        self.selection.default_mode.parse()
    }

    /// Build the application-level engine configuration.
    ///
    /// Fails with every error-severity issue when the configuration is not
    /// usable; warnings are left for the caller to report.
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let errors: Vec<ConfigIssue> = self
            .validate()
            .into_iter()
            .filter(ConfigIssue::is_error)
            .collect();
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }

        let generation = &self.generation;
        let retry = RetryPolicy::default()
            .with_max_attempts(generation.max_attempts)
            .with_backoff(
                Duration::from_millis(generation.initial_backoff_ms),
                Duration::from_millis(generation.max_backoff_ms),
            )
            .with_call_timeout(Duration::from_secs(generation.call_timeout_secs))
            .with_deadline(Duration::from_secs(generation.deadline_secs));

        let content = ContentLimits {
            max_chars: self.content.max_chars,
            max_abbreviations: generation.max_abbreviations,
            image: ImageConstraints {
                max_bytes: self.content.image_max_bytes,
                formats: self.content.parse_image_formats().0,
            },
        };

        let rewrite = RewriteParams {
            model: self
                .rewrite
                .model
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            sample_size: self.rewrite.sample_size,
        };

        Ok(EngineConfig {
            selection: SelectionParams {
                temperature: self.selection.temperature,
            },
            retry,
            content,
            rewrite,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_domain::ImageFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[selection]
temperature = 0.5
default_mode = "weighted"

[generation]
max_attempts = 5
initial_backoff_ms = 250
max_backoff_ms = 4000
call_timeout_secs = 30
deadline_secs = 90
max_abbreviations = 2

[content]
max_chars = 200
image_formats = ["png", "webp"]

[rewrite]
model = "openrouter/openai/o3-mini"
sample_size = 4

[providers]
max_tokens = 300

[storage]
backend = "memory"

[logging]
events_file = "events.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.selection.temperature, 0.5);
        assert_eq!(config.parse_default_mode().unwrap(), SelectionMode::Weighted);
        assert_eq!(config.generation.max_attempts, 5);
        assert_eq!(config.content.max_chars, 200);
        assert_eq!(config.providers.max_tokens, 300);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.logging.events_file.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[generation]
max_attempts = 2
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.generation.max_attempts, 2);
        // Defaults should apply
        assert_eq!(config.generation.initial_backoff_ms, 500);
        assert_eq!(config.selection.temperature, 1.0);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.providers.api_key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut config = FileConfig::default();
        config.selection.temperature = 0.0;
        config.generation.max_attempts = 0;
        config.generation.initial_backoff_ms = 9_000;
        config.content.max_chars = 0;

        let codes: Vec<ConfigIssueCode> = config.validate().into_iter().map(|i| i.code).collect();
        assert!(codes.contains(&ConfigIssueCode::NonPositiveTemperature));
        assert!(codes.contains(&ConfigIssueCode::ZeroAttempts));
        assert!(codes.contains(&ConfigIssueCode::BackoffInversion));
        assert!(codes.contains(&ConfigIssueCode::ZeroMaxChars));
    }

    #[test]
    fn test_unknown_mode_is_error() {
        let mut config = FileConfig::default();
        config.selection.default_mode = "greedy".to_string();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_warnings_do_not_block_engine_config() {
        let mut config = FileConfig::default();
        config.rewrite.sample_size = 0;
        config.content.image_formats = vec!["png".to_string(), "bmp".to_string()];

        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));

        let engine = config.to_engine_config().unwrap();
        assert_eq!(engine.content.image.formats, vec![ImageFormat::Png]);
    }

    #[test]
    fn test_to_engine_config() {
        let mut config = FileConfig::default();
        config.selection.temperature = 2.0;
        config.generation.max_attempts = 4;
        config.generation.initial_backoff_ms = 100;
        config.generation.max_backoff_ms = 1_000;
        config.generation.deadline_secs = 30;
        config.generation.max_abbreviations = 0;
        config.rewrite.model = Some("  ".to_string());

        let engine = config.to_engine_config().unwrap();
        assert_eq!(engine.selection.temperature, 2.0);
        assert_eq!(engine.retry.max_attempts, 4);
        assert_eq!(engine.retry.initial_backoff, Duration::from_millis(100));
        assert_eq!(engine.retry.max_backoff, Duration::from_secs(1));
        assert_eq!(engine.retry.deadline, Duration::from_secs(30));
        assert_eq!(engine.content.max_abbreviations, 0);
        assert!(engine.rewrite.model.is_none());
    }

    #[test]
    fn test_to_engine_config_rejects_errors() {
        let mut config = FileConfig::default();
        config.generation.call_timeout_secs = 0;

        match config.to_engine_config() {
            Err(ConfigError::Invalid(issues)) => {
                assert_eq!(
                    issues[0].code,
                    ConfigIssueCode::ZeroDuration {
                        field: "generation.call_timeout_secs"
                    }
                );
            }
            other => panic!("expected invalid config, got {:?}", other),
        }
    }
}
