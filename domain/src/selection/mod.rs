//! Candidate selection.
//!
//! - [`candidate::ScoredCandidate`]: a (model, prompt) pair with its feedback score
//! - [`candidate::CandidatePool`]: every eligible pair for one request
//! - [`mode::SelectionMode`]: random / weighted / highest
//! - [`policy::SelectionPolicy`]: the decision function

pub mod candidate;
pub mod mode;
pub mod policy;

pub use candidate::{CandidatePool, ScoredCandidate, aggregate_score};
pub use mode::SelectionMode;
pub use policy::{DEFAULT_TEMPERATURE, SelectionPolicy};
