//! Application-level configuration.
//!
//! - [`EngineConfig`]: everything the suggestion engine is tuned with
//! - [`RetryPolicy`]: provider retry, backoff and deadline control

pub mod engine_params;

pub use engine_params::{ContentLimits, EngineConfig, RetryPolicy, RewriteParams, SelectionParams};
