//! Configuration file loading for x-studio
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `XSTUDIO_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./x-studio.toml` or `./.x-studio.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/x-studio/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    ConfigIssue, ConfigIssueCode, FileConfig, FileContentConfig, FileGenerationConfig,
    FileLoggingConfig, FileProvidersConfig, FileRewriteConfig, FileSelectionConfig,
    FileStorageConfig, Severity, StorageBackend,
};
pub use loader::ConfigLoader;
