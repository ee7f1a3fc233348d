//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Caller input rejected before any provider call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Provider or model binding missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Model answered without decodable content
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Provider call exceeded its time budget
    #[error("Provider timeout: {0}")]
    Timeout(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// One item of a batch failed, failing the whole batch
    #[error("Processing '{filename}' failed: {source}")]
    BatchItem {
        filename: String,
        #[source]
        source: Box<ApplicationError>,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Wrap an item failure with the file it belongs to
    pub fn batch_item(filename: impl Into<String>, source: Self) -> Self {
        Self::BatchItem {
            filename: filename.into(),
            source: Box::new(source),
        }
    }

    /// Innermost error, looking through batch wrappers
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::BatchItem { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.root(),
            Self::RateLimited | Self::ExternalService(_) | Self::Timeout(_)
        )
    }
}

impl From<std::io::Error> for ApplicationError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("I/O error: {err}"))
    }
}
