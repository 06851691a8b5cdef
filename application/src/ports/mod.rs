//! Ports (interfaces) for the application layer
//!
//! Adapters implementing these traits live in the infrastructure layer.

pub mod event_logger;
pub mod generation_gateway;
pub mod suggestion_store;
