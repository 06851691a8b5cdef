//! Storage and event log configuration (`[storage]`, `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which store adapter backs the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file persisted on every mutation
    #[default]
    File,
    /// Process-local tables, lost on exit
    Memory,
}

/// Raw storage configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub backend: StorageBackend,
    /// Store file; defaults to the platform data directory
    pub path: Option<PathBuf>,
}

/// Raw event log configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving engine events; disabled when unset
    pub events_file: Option<PathBuf>,
}
