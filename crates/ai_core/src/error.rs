//! Inference errors

use thiserror::Error;

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Failed to connect to inference server
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to inference server failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API key rejected by the provider
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Model not found or not loaded
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Response parsing failed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during inference
    #[error("Inference timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl InferenceError {
    /// Map a transport error, reporting timeouts with the configured budget
    pub fn from_transport(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }

    /// Whether a caller may reasonably retry the request
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout(_) | Self::RateLimited | Self::ServerError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_includes_budget() {
        assert_eq!(
            InferenceError::Timeout(45_000).to_string(),
            "Inference timeout after 45000ms"
        );
    }

    #[test]
    fn unauthorized_message() {
        let err = InferenceError::Unauthorized("invalid api key".into());
        assert_eq!(err.to_string(), "Unauthorized: invalid api key");
    }

    #[test]
    fn retryable_classification() {
        assert!(InferenceError::Timeout(1).is_retryable());
        assert!(InferenceError::RateLimited.is_retryable());
        assert!(InferenceError::ServerError("502".into()).is_retryable());
        assert!(!InferenceError::InvalidResponse("x".into()).is_retryable());
        assert!(!InferenceError::Unauthorized("x".into()).is_retryable());
        assert!(!InferenceError::ModelNotAvailable("x".into()).is_retryable());
    }
}
