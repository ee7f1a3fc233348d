//! OpenAI-compatible Speech Provider
//!
//! Implements `SpeechToText` against `{base}/audio/transcriptions` and
//! `TextToSpeech` against `{base}/audio/speech`.
//!
//! # Supported Audio Formats
//!
//! ## STT
//! - mp3, mp4, mpeg, mpga, m4a, wav, webm, ogg, flac
//!
//! ## TTS
//! - mp3, opus, aac, flac, wav

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{AudioData, AudioFormat, SynthesisRequest, Transcription};

/// OpenAI TTS input limit in characters
const MAX_TTS_INPUT_CHARS: usize = 4096;

/// Speech provider for OpenAI-compatible audio APIs
#[derive(Debug, Clone)]
pub struct OpenAiSpeechProvider {
    client: Client,
    config: SpeechConfig,
}

impl OpenAiSpeechProvider {
    /// Create a new speech provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        info!(base_url = %config.base_url, "Initialized speech provider");

        Ok(Self { client, config })
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    fn stt_url(&self) -> String {
        format!("{}/audio/transcriptions", self.config.base_url.trim_end_matches('/'))
    }

    fn tts_url(&self) -> String {
        format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'))
    }

    /// Translate a non-success response into a typed error
    fn map_api_error(
        status: StatusCode,
        body: &str,
        model: &str,
        fallback: fn(String) -> SpeechError,
    ) -> SpeechError {
        if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
            return match api_error.error.code.as_deref() {
                Some("rate_limit_exceeded") => SpeechError::RateLimited,
                Some("model_not_found") => SpeechError::ModelNotAvailable(model.to_string()),
                Some("invalid_api_key") => SpeechError::Unauthorized(api_error.error.message),
                _ => match status {
                    StatusCode::UNAUTHORIZED => SpeechError::Unauthorized(api_error.error.message),
                    StatusCode::TOO_MANY_REQUESTS => SpeechError::RateLimited,
                    _ => fallback(api_error.error.message),
                },
            };
        }

        match status {
            StatusCode::UNAUTHORIZED => SpeechError::Unauthorized(body.to_string()),
            StatusCode::TOO_MANY_REQUESTS => SpeechError::RateLimited,
            _ => fallback(format!("HTTP {status}: {body}")),
        }
    }
}

/// Transcription response body
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// TTS request body
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
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
impl SpeechToText for OpenAiSpeechProvider {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn transcribe_file(
        &self,
        path: &Path,
        model: &str,
        language: Option<&str>,
    ) -> Result<Transcription, SpeechError> {
        let data = tokio::fs::read(path).await?;
        if data.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SpeechError::InvalidAudio("Audio file has no name".to_string()))?
            .to_string();
        let mime_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(AudioFormat::from_extension)
            .map_or("application/octet-stream", |f| f.mime_type());

        debug!(audio_size = data.len(), mime = mime_type, "Uploading audio for transcription");

        let file_part = Part::bytes(data)
            .file_name(filename)
            .mime_str(mime_type)
            .map_err(|e| SpeechError::InvalidAudio(format!("Invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", model.to_string())
            .text("response_format", "json");
        if let Some(language) = language.filter(|l| !l.is_empty()) {
            form = form.text("language", language.to_string());
        }

        let response = self
            .client
            .post(self.stt_url())
            .bearer_auth(self.api_key())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::from_transport(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %error_body, "Transcription request failed");
            return Err(Self::map_api_error(
                status,
                &error_body,
                model,
                SpeechError::TranscriptionFailed,
            ));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(
            text_len = body.text.len(),
            language = ?body.language,
            "Transcription complete"
        );

        let mut transcription = Transcription::new(body.text);
        if let Some(lang) = body.language {
            transcription = transcription.with_language(lang);
        }
        if let Some(duration) = body.duration {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let duration_ms = (duration * 1000.0) as u64;
            transcription = transcription.with_duration(duration_ms);
        }

        Ok(transcription)
    }
}

#[async_trait]
impl TextToSpeech for OpenAiSpeechProvider {
    #[instrument(skip(self, request), fields(model = %request.model, text_len = request.text.len()))]
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioData, SpeechError> {
        if request.text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let chars = request.text.chars().count();
        if chars > MAX_TTS_INPUT_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {chars} characters exceeds {MAX_TTS_INPUT_CHARS} limit"
            )));
        }

        if let Some(speed) = request.speed {
            if !(0.25..=4.0).contains(&speed) {
                return Err(SpeechError::SynthesisFailed(format!(
                    "Speed must be between 0.25 and 4.0, got {speed}"
                )));
            }
        }

        let format = request.format.unwrap_or(self.config.output_format);
        let voice = request.voice.as_deref().unwrap_or(&self.config.default_voice);

        let body = TtsRequest {
            model: &request.model,
            input: &request.text,
            voice,
            response_format: format.tts_response_format(),
            speed: request.speed,
            instructions: request.instructions.as_deref(),
        };

        let response = self
            .client
            .post(self.tts_url())
            .bearer_auth(self.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::from_transport(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %error_body, "Speech synthesis request failed");
            return Err(Self::map_api_error(
                status,
                &error_body,
                &request.model,
                SpeechError::SynthesisFailed,
            ));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        if audio_bytes.is_empty() {
            return Err(SpeechError::InvalidResponse("Empty audio body".to_string()));
        }

        debug!(audio_size = audio_bytes.len(), "Speech synthesis complete");

        Ok(AudioData::new(audio_bytes, format))
    }

    fn default_voice(&self) -> &str {
        &self.config.default_voice
    }
}
