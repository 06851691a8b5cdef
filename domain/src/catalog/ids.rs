//! Identifier newtypes for catalog rows
//!
//! Ids are plain integers assigned by the store, wrapped so a prompt id can
//! never be passed where a model id is expected.

use serde::{Deserialize, Serialize};

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                $name(id)
            }
        }
    };
}

catalog_id!(
    /// Identity of an [`AiModel`](super::AiModel)
    ModelId
);
catalog_id!(
    /// Identity of a [`Domain`](super::Domain)
    DomainId
);
catalog_id!(
    /// Identity of a [`Prompt`](super::Prompt)
    PromptId
);
catalog_id!(
    /// Identity of a [`GenerationOutput`](super::GenerationOutput)
    OutputId
);
catalog_id!(
    /// Identity of a [`Feedback`](super::Feedback) row
    FeedbackId
);

impl DomainId {
    /// The seeded "General" domain. It can never be deleted.
    pub const DEFAULT: DomainId = DomainId(1);

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}
