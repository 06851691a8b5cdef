//! Store adapters implementing the
//! [`SuggestionStore`](studio_application::SuggestionStore) port.
//!
//! - [`InMemoryStore`]: process-lifetime tables behind a `RwLock`
//! - [`JsonFileStore`]: the same tables persisted atomically to one JSON file

mod json_file;
mod memory;
mod tables;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
pub use tables::CatalogTables;
