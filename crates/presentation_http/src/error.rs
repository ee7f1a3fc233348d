//! API error handling
//!
//! Provides sanitized error responses that don't leak implementation details.
//! In production mode, upstream and internal errors return generic messages
//! without details.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details should be exposed in responses.
///
/// Set to `false` in production so provider messages, file paths and
/// configuration hints stay in the logs.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

const GENERIC_MESSAGE: &str = "An error occurred processing your request";

/// Strip messages that carry paths, URLs or credentials
fn sanitize_error_message(msg: &str) -> String {
    if should_expose_details() {
        return msg.to_string();
    }

    let sensitive_patterns = [
        "/home/", "/users/", "/var/", "/tmp/", "/etc/", "c:\\", "://", "bearer ", "sk-",
        "api_key", ".rs:",
    ];

    let msg_lower = msg.to_lowercase();
    if sensitive_patterns.iter().any(|p| msg_lower.contains(p)) {
        return GENERIC_MESSAGE.to_string();
    }

    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::RateLimited => "rate_limited",
            Self::BadGateway(_) => "upstream_error",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::GatewayTimeout(_) => "upstream_timeout",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let expose = should_expose_details();

        let (message, details) = match self {
            Self::BadRequest(msg) => (sanitize_error_message(&msg), None),
            Self::RateLimited => ("Rate limit exceeded".to_string(), None),
            Self::BadGateway(msg) => (
                "The AI provider returned an unusable response".to_string(),
                expose.then_some(msg),
            ),
            Self::ServiceUnavailable(msg) => {
                let message = if expose {
                    msg
                } else {
                    "Service temporarily unavailable".to_string()
                };
                (message, None)
            },
            Self::GatewayTimeout(msg) => (
                "The AI provider did not respond in time".to_string(),
                expose.then_some(msg),
            ),
            Self::Internal(msg) => (
                "An internal error occurred".to_string(),
                expose.then_some(msg),
            ),
        };

        if status.is_server_error() {
            tracing::error!(%status, code, error = %message, details = ?details, "Request failed");
        }

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        let message = err.to_string();
        match err.root() {
            ApplicationError::Domain(_) | ApplicationError::Validation(_) => {
                Self::BadRequest(message)
            },
            ApplicationError::RateLimited => Self::RateLimited,
            ApplicationError::Timeout(_) => Self::GatewayTimeout(message),
            ApplicationError::EmptyResponse(_) | ApplicationError::ExternalService(_) => {
                Self::BadGateway(message)
            },
            ApplicationError::Configuration(_) => Self::ServiceUnavailable(message),
            ApplicationError::Internal(_) | ApplicationError::BatchItem { .. } => {
                Self::Internal(message)
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_error_kind() {
        let cases = [
            (ApplicationError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApplicationError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ApplicationError::EmptyResponse("x".into()), StatusCode::BAD_GATEWAY),
            (ApplicationError::ExternalService("x".into()), StatusCode::BAD_GATEWAY),
            (ApplicationError::Configuration("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ApplicationError::Timeout("x".into()), StatusCode::GATEWAY_TIMEOUT),
            (ApplicationError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (source, expected) in cases {
            let api: ApiError = source.into();
            assert_eq!(api.status(), expected);
        }
    }

    #[test]
    fn batch_item_maps_by_root_and_keeps_filename() {
        let source = ApplicationError::batch_item("lesson.mp3", ApplicationError::RateLimited);
        assert!(matches!(ApiError::from(source), ApiError::RateLimited));

        let source =
            ApplicationError::batch_item("lesson.mp3", ApplicationError::Timeout("60s".into()));
        let ApiError::GatewayTimeout(msg) = ApiError::from(source) else {
            unreachable!("Expected GatewayTimeout");
        };
        assert!(msg.contains("lesson.mp3"));
    }

    #[test]
    fn domain_error_is_bad_request() {
        let api: ApiError = DomainError::UnknownProvider("mistral".into()).into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.code(), "bad_request");
    }

    #[test]
    fn error_response_omits_empty_details() {
        let resp = ErrorResponse {
            error: "Bad request".to_string(),
            code: "bad_request".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("code"));
        assert!(!json.contains("details"));
    }

    #[test]
    fn into_response_status() {
        let response = ApiError::GatewayTimeout("slow".into()).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
