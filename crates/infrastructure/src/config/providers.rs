//! AI provider connections and model bindings.

use domain::{AiProvider, Capability};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Model names per capability; unset means the provider lacks it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub speech_to_text: Option<String>,
    #[serde(default)]
    pub text_to_speech: Option<String>,
}

impl ModelsConfig {
    /// Model bound to `capability`, ignoring blank names
    #[must_use]
    pub fn for_capability(&self, capability: Capability) -> Option<&str> {
        let model = match capability {
            Capability::TextGeneration => self.text.as_deref(),
            Capability::SpeechToText => self.speech_to_text.as_deref(),
            Capability::TextToSpeech => self.text_to_speech.as_deref(),
        };
        model.map(str::trim).filter(|m| !m.is_empty())
    }
}

/// Connection to one OpenAI-compatible provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL including the version path, provider default when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key (bearer token)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub models: ModelsConfig,
}

const fn default_timeout_ms() -> u64 {
    120_000
}

/// Public endpoint of `provider`
#[must_use]
pub const fn default_base_url(provider: AiProvider) -> &'static str {
    match provider {
        AiProvider::Groq => "https://api.groq.com/openai/v1",
        AiProvider::OpenAi => "https://api.openai.com/v1",
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
            models: ModelsConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Configured base URL or the public endpoint of `provider`
    #[must_use]
    pub fn base_url_for(&self, provider: AiProvider) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| default_base_url(provider))
    }
}

/// Configured providers; an absent section leaves the provider unregistered
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub groq: Option<ProviderConfig>,
    #[serde(default)]
    pub openai: Option<ProviderConfig>,
}

impl ProvidersConfig {
    #[must_use]
    pub fn get(&self, provider: AiProvider) -> Option<&ProviderConfig> {
        match provider {
            AiProvider::Groq => self.groq.as_ref(),
            AiProvider::OpenAi => self.openai.as_ref(),
        }
    }

    /// Configured providers in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (AiProvider, &ProviderConfig)> {
        AiProvider::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|c| (p, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_model_counts_as_unset() {
        let models = ModelsConfig {
            text: Some("  ".into()),
            speech_to_text: Some("whisper-large-v3".into()),
            text_to_speech: None,
        };
        assert_eq!(models.for_capability(Capability::TextGeneration), None);
        assert_eq!(
            models.for_capability(Capability::SpeechToText),
            Some("whisper-large-v3")
        );
        assert_eq!(models.for_capability(Capability::TextToSpeech), None);
    }

    #[test]
    fn base_url_falls_back_to_public_endpoint() {
        let config = ProviderConfig::default();
        assert_eq!(
            config.base_url_for(AiProvider::Groq),
            "https://api.groq.com/openai/v1"
        );
        assert_eq!(
            config.base_url_for(AiProvider::OpenAi),
            "https://api.openai.com/v1"
        );
        assert_eq!(config.timeout_ms, 120_000);

        let custom = ProviderConfig {
            base_url: Some("http://localhost:8080/v1".into()),
            ..ProviderConfig::default()
        };
        assert_eq!(custom.base_url_for(AiProvider::Groq), "http://localhost:8080/v1");
    }

    #[test]
    fn iter_skips_unconfigured() {
        let providers = ProvidersConfig {
            groq: None,
            openai: Some(ProviderConfig::default()),
        };
        let listed: Vec<_> = providers.iter().map(|(p, _)| p).collect();
        assert_eq!(listed, vec![AiProvider::OpenAi]);
    }

    #[test]
    fn deserializes_from_toml() {
        let toml_str = r#"
            [openai]
            api_key = "sk-test"

            [openai.models]
            text = "gpt-4o"
            text_to_speech = "gpt-4o-mini-tts"
        "#;
        let providers: ProvidersConfig = toml::from_str(toml_str).unwrap();
        let openai = providers.openai.unwrap();
        assert!(openai.api_key.is_some());
        assert_eq!(openai.timeout_ms, 120_000);
        assert_eq!(openai.models.text.as_deref(), Some("gpt-4o"));
        assert!(providers.groq.is_none());
    }
}
