//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the OpenAI-compatible
//! provider client, Tera prompt templates, configuration loading, registry
//! wiring and logging setup.

pub mod adapters;
pub mod config;
pub mod registry;
pub mod telemetry;
pub mod templates;

pub use adapters::*;
pub use config::{
    AppConfig, Environment, ExercisesAppConfig, InvalidConfig, LogFormat, ModelsConfig,
    ProviderConfig, ProvidersConfig, ServerConfig, SpeechAppConfig, TranscriptionAppConfig,
};
pub use registry::{build_registry, build_registry_with, required_bindings};
pub use telemetry::{DEFAULT_LOG_FILTER, TelemetryError, init_logging};
pub use templates::{TemplateConfig, TemplateEngine, TemplateError};
