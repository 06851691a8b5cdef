//! Application services shared by the use cases
//!
//! - [`FeedbackAggregator`]: scores and eligible candidates
//! - [`GenerationInvoker`]: provider calls under the retry policy
//! - [`ResponseProcessor`]: cleaning and image validation

pub mod feedback_aggregator;
pub mod generation_invoker;
pub mod response_processor;

pub use feedback_aggregator::FeedbackAggregator;
pub use generation_invoker::{Generated, GenerationInvoker};
pub use response_processor::{OutputRejection, ResponseProcessor};
