//! Value Objects - Immutable, identity-less domain primitives

mod ai_provider;
mod capability;
mod difficulty;
mod token_usage;

pub use ai_provider::AiProvider;
pub use capability::Capability;
pub use difficulty::ExerciseDifficulty;
pub use token_usage::TokenUsage;
