//! AI client port - One provider's completion, transcription and synthesis calls

use std::path::Path;

use async_trait::async_trait;
use domain::{AiProvider, TokenUsage};
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::error::ApplicationError;

/// Sampling knobs for a completion; `None` leaves the provider default
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SamplingParams {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl SamplingParams {
    /// Provider defaults for both knobs
    pub const PROVIDER_DEFAULT: Self = Self {
        temperature: None,
        top_p: None,
    };

    #[must_use]
    pub const fn new(temperature: f32, top_p: f32) -> Self {
        Self {
            temperature: Some(temperature),
            top_p: Some(top_p),
        }
    }
}

/// A completion request constrained to a JSON schema
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredCompletionRequest {
    pub model: String,
    pub prompt: String,
    pub schema_name: String,
    pub schema: Value,
    pub sampling: SamplingParams,
}

/// Raw result of a completion call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionOutput {
    /// Model reported by the provider
    pub model: String,
    /// Content of every returned choice, in order
    pub choices: Vec<Option<String>>,
    pub usage: TokenUsage,
}

/// Parameters for synthesizing one chunk of speech
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub model: String,
    pub text: String,
    /// Voice id, provider default when unset
    pub voice: Option<String>,
    pub instructions: Option<String>,
    pub speed: f32,
}

/// Port for one AI provider
///
/// Implementations speak the provider's wire protocol; callers never branch
/// on which provider is behind the port.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AiClientPort: Send + Sync {
    /// Provider this client talks to
    fn provider(&self) -> AiProvider;

    /// Run one schema-constrained chat completion
    async fn complete(
        &self,
        request: StructuredCompletionRequest,
    ) -> Result<CompletionOutput, ApplicationError>;

    /// Transcribe a staged audio file
    ///
    /// # Arguments
    /// * `path` - File on disk; its name and extension are sent to the provider
    /// * `model` - Transcription model
    /// * `language` - Optional language hint
    async fn transcribe(
        &self,
        path: &Path,
        model: &str,
        language: Option<String>,
    ) -> Result<String, ApplicationError>;

    /// Synthesize MP3 audio for one chunk of text
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, ApplicationError>;
}
