//! Logging infrastructure: structured engine event logging.
//!
//! Provides [`JsonlEventLogger`], a JSONL file writer implementing the
//! [`EventLogger`](studio_application::EventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlEventLogger;
