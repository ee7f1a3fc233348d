//! Provider capabilities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Kind of work a provider model is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Chat completions with structured output
    TextGeneration,
    /// Audio transcription
    SpeechToText,
    /// Speech synthesis
    TextToSpeech,
}

impl Capability {
    /// All capabilities, in declaration order
    pub const ALL: [Self; 3] = [Self::TextGeneration, Self::SpeechToText, Self::TextToSpeech];

    /// Configuration key of the model bound to this capability
    #[must_use]
    pub const fn config_key(&self) -> &'static str {
        match self {
            Self::TextGeneration => "text",
            Self::SpeechToText => "speech_to_text",
            Self::TextToSpeech => "text_to_speech",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TextGeneration => "text generation",
            Self::SpeechToText => "speech-to-text",
            Self::TextToSpeech => "text-to-speech",
        };
        f.write_str(label)
    }
}

impl FromStr for Capability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "text" | "text_generation" => Ok(Self::TextGeneration),
            "speech_to_text" | "stt" => Ok(Self::SpeechToText),
            "text_to_speech" | "tts" => Ok(Self::TextToSpeech),
            _ => Err(DomainError::UnknownCapability(s.to_string())),
        }
    }
}
