//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: validation errors
//! - [`string`]: excerpt and preview helpers

pub mod error;
pub mod string;
