//! Provider registry wiring from configuration

use std::sync::Arc;

use application::{ProviderRegistry, error::ApplicationError, ports::AiClientPort};
use domain::{AiProvider, Capability};
use tracing::{info, warn};

use crate::adapters::OpenAiCompatibleClient;
use crate::config::{AppConfig, ProviderConfig};

/// Build the registry with one OpenAI-compatible client per configured provider
pub fn build_registry(config: &AppConfig) -> Result<ProviderRegistry, ApplicationError> {
    build_registry_with(config, |provider, provider_config| {
        let client = OpenAiCompatibleClient::from_config(provider, provider_config)?;
        Ok(Arc::new(client) as Arc<dyn AiClientPort>)
    })
}

/// Build the registry using `make_client` for each configured provider
pub fn build_registry_with<F>(
    config: &AppConfig,
    make_client: F,
) -> Result<ProviderRegistry, ApplicationError>
where
    F: Fn(AiProvider, &ProviderConfig) -> Result<Arc<dyn AiClientPort>, ApplicationError>,
{
    let mut builder = ProviderRegistry::builder();

    for (provider, provider_config) in config.providers.iter() {
        builder = builder.client(provider, make_client(provider, provider_config)?);

        for capability in Capability::ALL {
            match provider_config.models.for_capability(capability) {
                Some(model) => builder = builder.model(provider, capability, model),
                None => warn!(%provider, %capability, "No model configured"),
            }
        }
    }

    let registry = builder.build()?;
    required_bindings(&registry, config)?;

    info!(providers = ?registry.providers(), "Provider registry ready");
    Ok(registry)
}

/// Bindings the server cannot start without
pub fn required_bindings(
    registry: &ProviderRegistry,
    config: &AppConfig,
) -> Result<(), ApplicationError> {
    registry
        .require(config.speech.default_provider, Capability::TextToSpeech)
        .map_err(|e| {
            ApplicationError::Configuration(format!(
                "speech.default_provider is {}: {e}",
                config.speech.default_provider.config_key()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelsConfig;
    use secrecy::SecretString;

    fn provider(models: ModelsConfig) -> ProviderConfig {
        ProviderConfig {
            api_key: Some(SecretString::from("test-key")),
            models,
            ..ProviderConfig::default()
        }
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.providers.openai = Some(provider(ModelsConfig {
            text: Some("gpt-4o".into()),
            speech_to_text: Some("whisper-1".into()),
            text_to_speech: Some("gpt-4o-mini-tts".into()),
        }));
        config.providers.groq = Some(provider(ModelsConfig {
            text: Some("llama-3.3-70b-versatile".into()),
            speech_to_text: Some("whisper-large-v3".into()),
            text_to_speech: None,
        }));
        config
    }

    #[test]
    fn registers_configured_bindings() {
        let registry = build_registry(&config()).unwrap();

        assert_eq!(registry.providers(), vec![AiProvider::Groq, AiProvider::OpenAi]);
        assert_eq!(
            registry
                .resolve_model(AiProvider::Groq, Capability::SpeechToText)
                .unwrap(),
            "whisper-large-v3"
        );
        assert!(
            registry
                .resolve(AiProvider::Groq, Capability::TextToSpeech)
                .is_err()
        );
        assert_eq!(
            registry
                .resolve_client(AiProvider::OpenAi)
                .unwrap()
                .provider(),
            AiProvider::OpenAi
        );
    }

    #[test]
    fn default_tts_provider_without_model_fails() {
        let mut config = config();
        config.speech.default_provider = AiProvider::Groq;

        let err = build_registry(&config).unwrap_err();
        match err {
            ApplicationError::Configuration(msg) => {
                assert!(msg.contains("speech.default_provider is groq"));
                assert!(msg.contains("text-to-speech"));
            },
            other => unreachable!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn unconfigured_provider_is_not_registered() {
        let mut config = config();
        config.providers.groq = None;

        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.providers(), vec![AiProvider::OpenAi]);
        assert!(registry.resolve_client(AiProvider::Groq).is_err());
    }

    #[test]
    fn client_construction_errors_propagate() {
        let result = build_registry_with(&config(), |_, _| {
            Err(ApplicationError::Configuration("no key".into()))
        });
        assert!(matches!(result, Err(ApplicationError::Configuration(_))));
    }
}
