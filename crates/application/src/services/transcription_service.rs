//! Transcription service - Stage uploads on disk and transcribe them
//!
//! Each upload is written to a uniquely named staging file
//! (`<uuid>.<original extension>`) because transcription APIs infer the
//! container format from the file name. The staging file is a
//! `NamedTempFile` owned by the invocation and removed when it drops, on
//! success, error or cancellation alike.

use std::{fmt, path::PathBuf, sync::Arc};

use domain::{AiProvider, AudioUpload, Capability, TranscriptionResult};
use futures::{StreamExt, TryStreamExt, stream};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::provider_registry::{ModelBinding, ProviderRegistry};
use crate::error::ApplicationError;

/// Staging and fan-out settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionSettings {
    /// Directory for staging files, system temp dir when unset
    pub staging_dir: Option<PathBuf>,
    /// Files of one batch transcribed at the same time
    pub max_concurrency: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            staging_dir: None,
            max_concurrency: 4,
        }
    }
}

/// Service transcribing uploaded audio files
pub struct TranscriptionService {
    registry: Arc<ProviderRegistry>,
    settings: TranscriptionSettings,
}

impl fmt::Debug for TranscriptionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl TranscriptionService {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self::with_settings(registry, TranscriptionSettings::default())
    }

    pub fn with_settings(registry: Arc<ProviderRegistry>, settings: TranscriptionSettings) -> Self {
        Self { registry, settings }
    }

    /// Transcribe a single upload
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
    pub async fn transcribe(
        &self,
        upload: AudioUpload,
        language: &str,
        provider: AiProvider,
    ) -> Result<TranscriptionResult, ApplicationError> {
        upload.validate()?;
        let binding = self.registry.resolve(provider, Capability::SpeechToText)?;

        self.transcribe_one(&binding, upload, language).await
    }

    /// Transcribe every upload, failing the whole batch on the first error
    ///
    /// All uploads are validated before anything is staged or sent. Results
    /// keep the order of `uploads`.
    #[instrument(skip(self, uploads), fields(files = uploads.len(), %provider))]
    pub async fn transcribe_batch(
        &self,
        uploads: Vec<AudioUpload>,
        language: &str,
        provider: AiProvider,
    ) -> Result<Vec<TranscriptionResult>, ApplicationError> {
        if uploads.is_empty() {
            return Err(ApplicationError::Validation(
                "At least one file is required".to_string(),
            ));
        }

        for (index, upload) in uploads.iter().enumerate() {
            upload.validate().map_err(|e| {
                ApplicationError::Validation(format!("File #{} ({}): {e}", index + 1, upload.filename))
            })?;
        }

        let binding = self.registry.resolve(provider, Capability::SpeechToText)?;
        let concurrency = self.settings.max_concurrency.max(1);

        let results: Vec<TranscriptionResult> = stream::iter(uploads)
            .map(|upload| {
                let binding = &binding;
                async move {
                    let filename = upload.filename.clone();
                    self.transcribe_one(binding, upload, language)
                        .await
                        .map_err(|e| ApplicationError::batch_item(filename, e))
                }
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        info!(
            %provider,
            model = %binding.model,
            files = results.len(),
            language,
            "Transcribed batch"
        );

        Ok(results)
    }

    async fn transcribe_one(
        &self,
        binding: &ModelBinding,
        upload: AudioUpload,
        language: &str,
    ) -> Result<TranscriptionResult, ApplicationError> {
        let staged = self.stage(&upload).await?;

        debug!(
            filename = %upload.filename,
            staged = %staged.path().display(),
            "Staged upload for transcription"
        );

        let language_hint = (!language.trim().is_empty()).then(|| language.to_string());
        let text = binding
            .client
            .transcribe(staged.path(), &binding.model, language_hint)
            .await?;

        drop(staged);

        Ok(TranscriptionResult {
            filename: Some(upload.filename),
            language: language.to_string(),
            text,
        })
    }

    /// Write `upload` to `<uuid>.<ext>` in the staging directory
    async fn stage(&self, upload: &AudioUpload) -> Result<NamedTempFile, ApplicationError> {
        let extension = upload.extension().ok_or_else(|| {
            ApplicationError::Validation(format!(
                "File must have an extension: {}",
                upload.filename
            ))
        })?;
        let prefix = Uuid::new_v4().to_string();
        let suffix = format!(".{extension}");

        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(&suffix).rand_bytes(0);
        let file = match &self.settings.staging_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        tokio::fs::write(file.path(), &upload.bytes).await?;

        Ok(file)
    }
}
