//! Configuration for chat completion engines

use serde::{Deserialize, Serialize};

/// Connection settings for one OpenAI-compatible endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL including the API version path, e.g. `https://api.openai.com/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Completion token cap, provider default when unset
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

const fn default_timeout_ms() -> u64 {
    120_000 // 2 minutes, exercise batches are long generations
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            max_tokens: None,
        }
    }
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_ms", &self.timeout_ms)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl InferenceConfig {
    /// Config for the OpenAI API
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Config for Groq's OpenAI-compatible API
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("Base URL must not be empty".to_string());
        }
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err("API key is required".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_openai() {
        let config = InferenceConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_ms, 120_000);
        assert!(config.max_tokens.is_none());
    }

    #[test]
    fn groq_preset_uses_groq_base_url() {
        let config = InferenceConfig::groq("gsk-test");
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.api_key.as_deref(), Some("gsk-test"));
    }

    #[test]
    fn validate_requires_api_key() {
        assert!(InferenceConfig::default().validate().is_err());
        let mut config = InferenceConfig::openai("");
        assert!(config.validate().is_err());
        config.api_key = Some("sk-test".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = InferenceConfig::openai("sk-test");
        config.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let debug = format!("{:?}", InferenceConfig::openai("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn config_deserialization_with_defaults() {
        let config: InferenceConfig = serde_json::from_str(r#"{"api_key":"k"}"#).unwrap();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_ms, 120_000);
    }
}
