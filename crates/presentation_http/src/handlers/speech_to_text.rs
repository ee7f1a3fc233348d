//! Speech-to-text handler
//!
//! Accepts `multipart/form-data` with one or more `file` parts plus
//! `language` and `provider` text fields.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
};
use domain::{AiProvider, AudioUpload, TranscriptionResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Transcript of one uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechToTextResponse {
    pub file_name: Option<String>,
    pub language: String,
    pub text: String,
}

impl From<TranscriptionResult> for SpeechToTextResponse {
    fn from(result: TranscriptionResult) -> Self {
        Self {
            file_name: result.filename,
            language: result.language,
            text: result.text,
        }
    }
}

/// Parsed multipart form
#[derive(Debug)]
pub struct SpeechToTextForm {
    pub files: Vec<AudioUpload>,
    pub language: String,
    pub provider: AiProvider,
}

impl SpeechToTextForm {
    /// Read every part of the form, keeping `file` parts in upload order
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut files = Vec::new();
        let mut language = None;
        let mut provider = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(ToString::to_string);
            match name.as_deref() {
                Some("file") => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    files.push(AudioUpload::new(filename, bytes.to_vec()));
                },
                Some("language") => {
                    language = Some(field.text().await.map_err(multipart_error)?);
                },
                Some("provider") => {
                    let token = field.text().await.map_err(multipart_error)?;
                    provider = Some(token.parse::<AiProvider>()?);
                },
                other => debug!(field = ?other, "Ignoring unknown form field"),
            }
        }

        let language = language
            .map(|l| l.trim().to_string())
            .ok_or_else(|| ApiError::BadRequest("language is required".to_string()))?;
        let provider =
            provider.ok_or_else(|| ApiError::BadRequest("provider is required".to_string()))?;
        if files.is_empty() {
            return Err(ApiError::BadRequest(
                "At least one file is required".to_string(),
            ));
        }

        Ok(Self {
            files,
            language,
            provider,
        })
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::BadRequest(err.body_text())
}

/// Transcribe uploaded audio files, one result per file in upload order
pub async fn speech_to_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<SpeechToTextResponse>>, ApiError> {
    let form = SpeechToTextForm::from_multipart(multipart).await?;
    debug!(
        files = form.files.len(),
        provider = %form.provider,
        language = %form.language,
        "Transcription request accepted"
    );

    let results = state
        .transcription_service
        .transcribe_batch(form.files, &form.language, form.provider)
        .await?;

    Ok(Json(results.into_iter().map(Into::into).collect()))
}
