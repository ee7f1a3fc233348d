//! Exercise generation, speech synthesis and transcription settings.

use std::path::PathBuf;

use application::{
    ExerciseSettings, GenerationMode, SamplingParams, SpeechSettings, TranscriptionSettings,
};
use domain::AiProvider;
use serde::{Deserialize, Serialize};

/// Exercise generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisesAppConfig {
    /// `two_phase` (default) or the deprecated `single_phase`
    #[serde(default)]
    pub mode: GenerationMode,

    /// Drafting temperature
    #[serde(default = "default_draft_temperature")]
    pub draft_temperature: f32,

    /// Drafting nucleus sampling
    #[serde(default = "default_top_p")]
    pub draft_top_p: f32,

    /// Grading temperature, provider default when unset
    #[serde(default)]
    pub grading_temperature: Option<f32>,

    /// Grading nucleus sampling, provider default when unset
    #[serde(default)]
    pub grading_top_p: Option<f32>,

    /// Directory with prompt template overrides
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

const fn default_draft_temperature() -> f32 {
    1.75
}

const fn default_top_p() -> f32 {
    0.95
}

impl Default for ExercisesAppConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            draft_temperature: default_draft_temperature(),
            draft_top_p: default_top_p(),
            grading_temperature: None,
            grading_top_p: None,
            templates_dir: None,
        }
    }
}

impl ExercisesAppConfig {
    #[must_use]
    pub fn to_settings(&self) -> ExerciseSettings {
        ExerciseSettings {
            mode: self.mode,
            draft_sampling: SamplingParams::new(self.draft_temperature, self.draft_top_p),
            grading_sampling: SamplingParams {
                temperature: self.grading_temperature,
                top_p: self.grading_top_p,
            },
            ..ExerciseSettings::default()
        }
    }
}

/// Text-to-speech configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechAppConfig {
    /// Provider used when a request names none
    #[serde(default = "default_tts_provider")]
    pub default_provider: AiProvider,

    /// Voice id
    #[serde(default = "default_voice")]
    pub voice: Option<String>,

    /// Chunks synthesized concurrently per request
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,
}

const fn default_tts_provider() -> AiProvider {
    AiProvider::OpenAi
}

#[allow(clippy::unnecessary_wraps)]
fn default_voice() -> Option<String> {
    Some("alloy".to_string())
}

const fn default_concurrency() -> usize {
    4
}

impl Default for SpeechAppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_tts_provider(),
            voice: default_voice(),
            max_concurrency: default_concurrency(),
        }
    }
}

impl SpeechAppConfig {
    #[must_use]
    pub fn to_settings(&self) -> SpeechSettings {
        SpeechSettings {
            default_provider: self.default_provider,
            voice: self.voice.clone().filter(|v| !v.trim().is_empty()),
            max_concurrency: self.max_concurrency,
        }
    }
}

/// Speech-to-text configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionAppConfig {
    /// Directory for staged uploads, system temp dir when unset
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,

    /// Files transcribed concurrently per request
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,
}

impl Default for TranscriptionAppConfig {
    fn default() -> Self {
        Self {
            staging_dir: None,
            max_concurrency: default_concurrency(),
        }
    }
}

impl TranscriptionAppConfig {
    #[must_use]
    pub fn to_settings(&self) -> TranscriptionSettings {
        TranscriptionSettings {
            staging_dir: self.staging_dir.clone(),
            max_concurrency: self.max_concurrency,
        }
    }
}
