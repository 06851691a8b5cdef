//! Default catalog for a fresh store
//!
//! Only free text models are seeded; the image model is the one the image
//! endpoint accepts by default.

use super::entities::OutputType;

/// Model row to seed: (routing name, produces_text, produces_image)
pub const DEFAULT_MODELS: &[(&str, bool, bool)] = &[
    ("openrouter/openai/o3-mini", true, false),
    (
        "openrouter/google/gemini-2.0-flash-lite-preview-02-05:free",
        true,
        false,
    ),
    ("openrouter/sophosympatheia/rogue-rose-103b-v0.2:free", true, false),
    ("dall-e-3", false, true),
];

/// Name of the default domain (always id 1)
pub const DEFAULT_DOMAIN_NAME: &str = "General";

/// Prompts seeded into the default domain
pub const DEFAULT_PROMPTS: &[(&str, OutputType)] = &[
    (
        "Write an achingly beautiful tweet. Consider the following user-provided context to seed your response: {context}",
        OutputType::Text,
    ),
    (
        "Create an achingly beautiful image. Consider the following user-provided context to seed your response: {context}",
        OutputType::Image,
    ),
];
