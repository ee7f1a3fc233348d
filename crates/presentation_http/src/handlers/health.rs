//! Health check handlers

use std::collections::BTreeMap;

use axum::{Json, extract::State, http::StatusCode};
use domain::Capability;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Provider key of the default text-to-speech provider
    pub default_speech_provider: String,
    /// `provider -> capability -> model`
    pub providers: BTreeMap<String, BTreeMap<String, String>>,
}

/// Readiness check - are the provider bindings usable?
///
/// Ready when at least one provider is registered and the default
/// text-to-speech provider has a model.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let default_provider = state.config.speech.default_provider;

    let providers: BTreeMap<String, BTreeMap<String, String>> = state
        .registry
        .summary()
        .into_iter()
        .map(|(provider, models)| {
            let models = models
                .into_iter()
                .map(|(capability, model)| (capability.config_key().to_string(), model))
                .collect();
            (provider.config_key().to_string(), models)
        })
        .collect();

    let ready = !state.registry.providers().is_empty()
        && state
            .registry
            .require(default_provider, Capability::TextToSpeech)
            .is_ok();

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            default_speech_provider: default_provider.config_key().to_string(),
            providers,
        }),
    )
}
