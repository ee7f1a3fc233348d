//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Provider token did not match any known provider
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Difficulty token did not match any CEFR tier
    #[error("Invalid difficulty level: {0}")]
    InvalidDifficulty(String),

    /// Capability token did not match any capability
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
