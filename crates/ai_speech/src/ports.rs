//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use std::path::Path;

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, SynthesisRequest, Transcription};

/// Port for Speech-to-Text (STT) implementations
///
/// Implementations upload an audio file that already exists on disk. The
/// caller owns the file and is responsible for removing it.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe the audio file at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Staged audio file; its file name and extension are sent to
    ///   the service
    /// * `model` - Transcription model to use
    /// * `language` - Optional ISO 639-1 hint (e.g. "en", "de", "es")
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the file cannot be read or transcription fails.
    async fn transcribe_file(
        &self,
        path: &Path,
        model: &str,
        language: Option<&str>,
    ) -> Result<Transcription, SpeechError>;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to speech
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioData, SpeechError>;

    /// Voice used when a request does not name one
    fn default_voice(&self) -> &str;
}
