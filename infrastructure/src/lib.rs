//! Infrastructure layer for x-studio
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, FileConfig, FileProvidersConfig, Severity,
    StorageBackend,
};
pub use logging::JsonlEventLogger;
pub use providers::OpenAiCompatibleGateway;
pub use store::{CatalogTables, InMemoryStore, JsonFileStore};
