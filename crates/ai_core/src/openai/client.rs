//! OpenAI-compatible chat completion client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::ports::{
    CompletionChoice, CompletionRequest, CompletionResponse, InferenceEngine, TokenUsage,
};

/// Chat completion engine for OpenAI-compatible APIs
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleEngine {
    client: Client,
    config: InferenceConfig,
}

impl OpenAiCompatibleEngine {
    /// Create a new engine
    ///
    /// Returns `InferenceError::Configuration` if the configuration is invalid.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        config.validate().map_err(InferenceError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            "Initialized chat completion engine"
        );

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    fn map_error_status(status: StatusCode, body: &str, model: &str) -> InferenceError {
        let detail = serde_json::from_str::<ApiError>(body).ok().map(|e| e.error);

        if let Some(code) = detail.as_ref().and_then(|d| d.code.as_deref()) {
            match code {
                "rate_limit_exceeded" => return InferenceError::RateLimited,
                "model_not_found" => return InferenceError::ModelNotAvailable(model.to_string()),
                "invalid_api_key" => {
                    return InferenceError::Unauthorized(
                        detail.map(|d| d.message).unwrap_or_default(),
                    );
                },
                _ => {},
            }
        }

        let message = detail.map_or_else(|| body.to_string(), |d| d.message);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                InferenceError::Unauthorized(message)
            },
            StatusCode::TOO_MANY_REQUESTS => InferenceError::RateLimited,
            StatusCode::NOT_FOUND => InferenceError::ModelNotAvailable(model.to_string()),
            s if s.is_server_error() => InferenceError::ServerError(format!("Status {s}: {message}")),
            s => InferenceError::RequestFailed(format!("Status {s}: {message}")),
        }
    }
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    index: u32,
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[async_trait]
impl InferenceEngine for OpenAiCompatibleEngine {
    #[instrument(skip(self, request), fields(model = %request.model, base_url = %self.config.base_url))]
    async fn complete(
        &self,
        mut request: CompletionRequest,
    ) -> Result<CompletionResponse, InferenceError> {
        if request.max_tokens.is_none() {
            request.max_tokens = self.config.max_tokens;
        }

        debug!(
            temperature = ?request.temperature,
            top_p = ?request.top_p,
            structured = request.response_format.is_some(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::from_transport(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Chat completion request failed");
            return Err(Self::map_error_status(status, &body, &request.model));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let choices = body
            .choices
            .into_iter()
            .map(|choice| {
                if let Some(refusal) = &choice.message.refusal {
                    warn!(index = choice.index, refusal = %refusal, "Model refused to answer");
                }
                CompletionChoice {
                    index: choice.index,
                    content: choice.message.content,
                    finish_reason: choice.finish_reason,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            choices = choices.len(),
            tokens = ?body.usage,
            "Chat completion finished"
        );

        Ok(CompletionResponse {
            model: body.model,
            choices,
            usage: body.usage,
        })
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_missing_api_key() {
        let result = OpenAiCompatibleEngine::new(InferenceConfig::default());
        assert!(matches!(result, Err(InferenceError::Configuration(_))));
    }

    #[test]
    fn completions_url_trims_trailing_slash() {
        let mut config = InferenceConfig::groq("gsk");
        config.base_url.push('/');
        let engine = OpenAiCompatibleEngine::new(config).unwrap();
        assert_eq!(
            engine.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn status_mapping() {
        let err = OpenAiCompatibleEngine::map_error_status(StatusCode::UNAUTHORIZED, "", "m");
        assert!(matches!(err, InferenceError::Unauthorized(_)));

        let err = OpenAiCompatibleEngine::map_error_status(StatusCode::TOO_MANY_REQUESTS, "", "m");
        assert!(matches!(err, InferenceError::RateLimited));

        let err = OpenAiCompatibleEngine::map_error_status(StatusCode::BAD_GATEWAY, "oops", "m");
        assert!(matches!(err, InferenceError::ServerError(ref s) if s.contains("oops")));

        let err = OpenAiCompatibleEngine::map_error_status(StatusCode::BAD_REQUEST, "bad", "m");
        assert!(matches!(err, InferenceError::RequestFailed(_)));
    }

    #[test]
    fn api_error_code_takes_precedence() {
        let body = r#"{"error":{"message":"The model `x` does not exist","type":"invalid_request_error","code":"model_not_found"}}"#;
        let err = OpenAiCompatibleEngine::map_error_status(StatusCode::BAD_REQUEST, body, "x");
        assert!(matches!(err, InferenceError::ModelNotAvailable(ref m) if m == "x"));
    }

    #[test]
    fn api_error_message_is_extracted() {
        let body = r#"{"error":{"message":"schema invalid","type":"invalid_request_error"}}"#;
        let err = OpenAiCompatibleEngine::map_error_status(StatusCode::BAD_REQUEST, body, "m");
        assert_eq!(err.to_string(), "Request failed: Status 400 Bad Request: schema invalid");
    }
}
