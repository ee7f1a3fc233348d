//! Application state shared across handlers

use std::sync::Arc;

use application::{
    ExerciseService, ProviderRegistry, SpeechSynthesisService, TranscriptionService,
};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Exercise generation
    pub exercise_service: Arc<ExerciseService>,
    /// Speech-to-text
    pub transcription_service: Arc<TranscriptionService>,
    /// Text-to-speech
    pub speech_service: Arc<SpeechSynthesisService>,
    /// Provider and model bindings, reported by the readiness check
    pub registry: Arc<ProviderRegistry>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}
