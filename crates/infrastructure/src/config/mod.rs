//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `providers`: AI provider connections and model bindings
//! - `features`: exercise, speech and transcription settings
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `config.toml` in the working directory, then environment variables with
//! the `LANGCOACH` prefix and `__` as the nesting separator, for example
//! `LANGCOACH__PROVIDERS__OPENAI__API_KEY`.

mod features;
mod providers;
mod server;

use std::fmt;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use features::{ExercisesAppConfig, SpeechAppConfig, TranscriptionAppConfig};
pub use providers::{ModelsConfig, ProviderConfig, ProvidersConfig, default_base_url};
pub use server::{LogFormat, ServerConfig};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LANGCOACH";
/// Separator between nested keys in environment variable names
pub const ENV_SEPARATOR: &str = "__";

/// Application environment (development or production)
///
/// Production hides internal error details from API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - detailed error responses
    #[default]
    Development,
    /// Production environment - sanitized error responses
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Configuration that loaded but cannot be used
#[derive(Debug, Error)]
#[error("Invalid configuration: {}", problems.join("; "))]
pub struct InvalidConfig {
    pub problems: Vec<String>,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// AI providers
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Exercise generation
    #[serde(default)]
    pub exercises: ExercisesAppConfig,

    /// Text-to-speech
    #[serde(default)]
    pub speech: SpeechAppConfig,

    /// Speech-to-text
    #[serde(default)]
    pub transcription: TranscriptionAppConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder()
    }

    /// Check ranges and required values
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        let mut problems = Vec::new();

        if self.server.host.trim().is_empty() {
            problems.push("server.host must not be empty".to_string());
        }

        if self.providers.iter().next().is_none() {
            problems.push("at least one provider must be configured under [providers]".to_string());
        }

        for (provider, config) in self.providers.iter() {
            let key = provider.config_key();
            let base_url = config.base_url_for(provider);
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                problems.push(format!(
                    "providers.{key}.base_url must be an http(s) URL, got '{base_url}'"
                ));
            }
            if config.timeout_ms == 0 {
                problems.push(format!("providers.{key}.timeout_ms must be greater than 0"));
            }
            let has_key = config
                .api_key
                .as_ref()
                .is_some_and(|k| !k.expose_secret().trim().is_empty());
            if !has_key {
                problems.push(format!("providers.{key}.api_key is required"));
            }
        }

        let exercises = &self.exercises;
        check_temperature(
            &mut problems,
            "exercises.draft_temperature",
            Some(exercises.draft_temperature),
        );
        check_top_p(&mut problems, "exercises.draft_top_p", Some(exercises.draft_top_p));
        check_temperature(
            &mut problems,
            "exercises.grading_temperature",
            exercises.grading_temperature,
        );
        check_top_p(&mut problems, "exercises.grading_top_p", exercises.grading_top_p);

        if self.speech.max_concurrency == 0 {
            problems.push("speech.max_concurrency must be at least 1".to_string());
        }
        if self.transcription.max_concurrency == 0 {
            problems.push("transcription.max_concurrency must be at least 1".to_string());
        }
        if let Some(dir) = self.transcription.staging_dir.as_ref().filter(|d| !d.is_dir()) {
            problems.push(format!(
                "transcription.staging_dir does not exist: {}",
                dir.display()
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(InvalidConfig { problems })
        }
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn check_temperature(problems: &mut Vec<String>, name: &str, value: Option<f32>) {
    if let Some(v) = value.filter(|v| !(0.0..=2.0).contains(v)) {
        problems.push(format!("{name} must be between 0 and 2, got {v}"));
    }
}

fn check_top_p(problems: &mut Vec<String>, name: &str, value: Option<f32>) {
    if let Some(v) = value.filter(|v| !(*v > 0.0 && *v <= 1.0)) {
        problems.push(format!("{name} must be in (0, 1], got {v}"));
    }
}
