//! Text-to-speech handler

use application::SynthesisCommand;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use domain::AiProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::{
    archive::{ARCHIVE_FILE_NAME, zip_chunks},
    error::ApiError,
    middleware::ValidatedJson,
    state::AppState,
};

/// One text split into chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunks {
    #[serde(default)]
    pub chunks: Vec<String>,
}

/// Text-to-speech request body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TextToSpeechRequest {
    #[validate(length(min = 1, message = "must contain at least one text"))]
    pub texts: Vec<TextChunks>,

    #[validate(length(max = 4096, message = "must be at most 4096 characters"))]
    pub instructions: Option<String>,

    #[validate(range(min = 0.25, max = 4.0, message = "must be between 0.25 and 4.0"))]
    pub speed: Option<f32>,

    /// Falls back to the configured default provider
    pub provider: Option<AiProvider>,
}

impl From<TextToSpeechRequest> for SynthesisCommand {
    fn from(body: TextToSpeechRequest) -> Self {
        let texts = body.texts.into_iter().map(|t| t.chunks).collect();
        Self {
            instructions: body.instructions,
            speed: body.speed,
            provider: body.provider,
            ..Self::new(texts)
        }
    }
}

/// Synthesize every chunk and return the audio as `files.zip`
pub async fn text_to_speech(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<TextToSpeechRequest>,
) -> Result<Response, ApiError> {
    let command = SynthesisCommand::from(body);
    debug!(
        texts = command.texts.len(),
        provider = ?command.provider,
        "Speech synthesis request accepted"
    );

    let chunks = state.speech_service.synthesize(command).await?;
    let archive = zip_chunks(&chunks)
        .map_err(|e| ApiError::Internal(format!("Failed to build archive: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ARCHIVE_FILE_NAME}\""),
            ),
        ],
        archive,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_maps_to_command() {
        let body: TextToSpeechRequest = serde_json::from_str(
            r#"{"texts":[{"chunks":["Hola","Adiós"]},{"chunks":[]}],
                "instructions":"Speak slowly","speed":0.8,"provider":"Openai"}"#,
        )
        .unwrap();

        let command = SynthesisCommand::from(body);
        assert_eq!(command.texts, vec![vec!["Hola".to_string(), "Adiós".to_string()], vec![]]);
        assert_eq!(command.instructions.as_deref(), Some("Speak slowly"));
        assert_eq!(command.speed, Some(0.8));
        assert_eq!(command.provider, Some(AiProvider::OpenAi));
    }

    #[test]
    fn speed_and_provider_are_optional() {
        let body: TextToSpeechRequest =
            serde_json::from_str(r#"{"texts":[{"chunks":["Hallo"]}]}"#).unwrap();
        assert!(body.validate().is_ok());

        let command = SynthesisCommand::from(body);
        assert!(command.speed.is_none());
        assert!(command.provider.is_none());
    }

    #[test]
    fn speed_out_of_range_fails_validation() {
        let body: TextToSpeechRequest =
            serde_json::from_str(r#"{"texts":[{"chunks":["Hallo"]}],"speed":5.0}"#).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn empty_texts_fail_validation() {
        let body: TextToSpeechRequest = serde_json::from_str(r#"{"texts":[]}"#).unwrap();
        assert!(body.validate().is_err());
    }
}
