//! Provider client adapter - Implements AiClientPort over the OpenAI-compatible transports
//!
//! One adapter instance serves one provider. Chat completions go through
//! `ai_core`, transcription and synthesis through `ai_speech`; all of them
//! share the provider's base URL, key and timeout.

use std::{path::Path, sync::Arc};

use ai_core::{
    CompletionRequest, InferenceConfig, InferenceEngine, InferenceError, OpenAiCompatibleEngine,
    ResponseFormat,
};
use ai_speech::{
    AudioFormat, OpenAiSpeechProvider, SpeechConfig, SpeechError, SpeechToText, SynthesisRequest,
    TextToSpeech,
};
use application::{
    error::ApplicationError,
    ports::{AiClientPort, CompletionOutput, SpeechRequest, StructuredCompletionRequest},
};
use async_trait::async_trait;
use domain::{AiProvider, TokenUsage};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::ProviderConfig;

/// Client for one OpenAI-compatible provider
pub struct OpenAiCompatibleClient {
    provider: AiProvider,
    engine: Arc<dyn InferenceEngine>,
    transcriber: Arc<dyn SpeechToText>,
    synthesizer: Arc<dyn TextToSpeech>,
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("provider", &self.provider)
            .field("base_url", &self.engine.base_url())
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleClient {
    /// Build the transports for `provider` from its configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a transport rejects the
    /// configuration.
    pub fn from_config(
        provider: AiProvider,
        config: &ProviderConfig,
    ) -> Result<Self, ApplicationError> {
        let base_url = config.base_url_for(provider).to_string();
        let api_key = config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().to_string());

        let engine = OpenAiCompatibleEngine::new(InferenceConfig {
            base_url: base_url.clone(),
            api_key: api_key.clone(),
            timeout_ms: config.timeout_ms,
            max_tokens: None,
        })
        .map_err(map_inference_error)?;

        let speech = Arc::new(
            OpenAiSpeechProvider::new(SpeechConfig {
                base_url,
                api_key,
                timeout_ms: config.timeout_ms,
                ..SpeechConfig::default()
            })
            .map_err(map_speech_error)?,
        );

        Ok(Self::new(
            provider,
            Arc::new(engine),
            Arc::clone(&speech) as Arc<dyn SpeechToText>,
            speech,
        ))
    }

    /// Assemble from existing transports
    pub fn new(
        provider: AiProvider,
        engine: Arc<dyn InferenceEngine>,
        transcriber: Arc<dyn SpeechToText>,
        synthesizer: Arc<dyn TextToSpeech>,
    ) -> Self {
        Self {
            provider,
            engine,
            transcriber,
            synthesizer,
        }
    }
}

/// Map completion transport errors to application errors
pub fn map_inference_error(err: InferenceError) -> ApplicationError {
    match err {
        InferenceError::Configuration(e) => ApplicationError::Configuration(e),
        InferenceError::ModelNotAvailable(m) => {
            ApplicationError::Configuration(format!("Model not available: {m}"))
        },
        InferenceError::Timeout(ms) => ApplicationError::Timeout(format!("no response after {ms}ms")),
        InferenceError::RateLimited => ApplicationError::RateLimited,
        InferenceError::Unauthorized(e) => {
            ApplicationError::ExternalService(format!("Unauthorized: {e}"))
        },
        InferenceError::ConnectionFailed(e)
        | InferenceError::RequestFailed(e)
        | InferenceError::ServerError(e) => ApplicationError::ExternalService(e),
        InferenceError::InvalidResponse(e) => {
            ApplicationError::ExternalService(format!("Invalid response: {e}"))
        },
    }
}

/// Map speech transport errors to application errors
pub fn map_speech_error(err: SpeechError) -> ApplicationError {
    match err {
        SpeechError::Configuration(e) => ApplicationError::Configuration(e),
        SpeechError::ModelNotAvailable(m) => {
            ApplicationError::Configuration(format!("Model not available: {m}"))
        },
        SpeechError::InvalidAudio(e) => ApplicationError::Validation(format!("Invalid audio: {e}")),
        SpeechError::Timeout(ms) => ApplicationError::Timeout(format!("no response after {ms}ms")),
        SpeechError::RateLimited => ApplicationError::RateLimited,
        SpeechError::Unauthorized(e) => {
            ApplicationError::ExternalService(format!("Unauthorized: {e}"))
        },
        SpeechError::ConnectionFailed(e) | SpeechError::RequestFailed(e) => {
            ApplicationError::ExternalService(e)
        },
        SpeechError::TranscriptionFailed(e) => {
            ApplicationError::ExternalService(format!("Transcription failed: {e}"))
        },
        SpeechError::SynthesisFailed(e) => {
            ApplicationError::ExternalService(format!("Synthesis failed: {e}"))
        },
        SpeechError::InvalidResponse(e) => {
            ApplicationError::ExternalService(format!("Invalid response: {e}"))
        },
        SpeechError::Io(e) => ApplicationError::Internal(format!("I/O error: {e}")),
    }
}

#[async_trait]
impl AiClientPort for OpenAiCompatibleClient {
    fn provider(&self) -> AiProvider {
        self.provider
    }

    #[instrument(skip(self, request), fields(provider = %self.provider, model = %request.model, schema = %request.schema_name))]
    async fn complete(
        &self,
        request: StructuredCompletionRequest,
    ) -> Result<CompletionOutput, ApplicationError> {
        let completion = CompletionRequest::simple(request.model, request.prompt)
            .with_temperature(request.sampling.temperature)
            .with_top_p(request.sampling.top_p)
            .with_response_format(ResponseFormat::json_schema(
                request.schema_name,
                request.schema,
            ));

        let response = self
            .engine
            .complete(completion)
            .await
            .map_err(map_inference_error)?;

        let usage = response.usage.map_or_else(TokenUsage::default, |u| {
            TokenUsage::new(u64::from(u.prompt_tokens), u64::from(u.completion_tokens))
        });
        debug!(
            choices = response.choices.len(),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Completion received"
        );

        Ok(CompletionOutput {
            model: response.model,
            choices: response.choices.into_iter().map(|c| c.content).collect(),
            usage,
        })
    }

    #[instrument(skip(self, path), fields(provider = %self.provider))]
    async fn transcribe(
        &self,
        path: &Path,
        model: &str,
        language: Option<String>,
    ) -> Result<String, ApplicationError> {
        let transcription = self
            .transcriber
            .transcribe_file(path, model, language.as_deref())
            .await
            .map_err(map_speech_error)?;
        Ok(transcription.text)
    }

    #[instrument(skip(self, request), fields(provider = %self.provider, model = %request.model, chars = request.text.len()))]
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, ApplicationError> {
        let mut synthesis = SynthesisRequest::new(request.text, request.model)
            .with_instructions(request.instructions)
            .with_speed(request.speed);
        if let Some(voice) = request.voice {
            synthesis = synthesis.with_voice(voice);
        }
        synthesis.format = Some(AudioFormat::Mp3);

        let audio = self
            .synthesizer
            .synthesize(&synthesis)
            .await
            .map_err(map_speech_error)?;
        Ok(audio.into_data())
    }
}
