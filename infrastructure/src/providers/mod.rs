//! Generation provider adapters

mod openai_compatible;

pub use openai_compatible::{OpenAiCompatibleGateway, api_model_name, classify_status};
