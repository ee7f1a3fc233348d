//! Language Coach HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{ExerciseService, SpeechSynthesisService, TranscriptionService};
use axum::http::{HeaderValue, Method};
use infrastructure::{
    AppConfig, DEFAULT_LOG_FILTER, Environment, TemplateConfig, TemplateEngine, build_registry,
    init_logging,
};
use presentation_http::{
    ShutdownOutcome, routes, serve, set_expose_internal_errors, state::AppState,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_logging(config.server.log_format, DEFAULT_LOG_FILTER)
        .context("Failed to initialize logging")?;

    info!("Language Coach v{} starting...", env!("CARGO_PKG_VERSION"));

    config.validate()?;
    set_expose_internal_errors(config.environment == Environment::Development);

    info!(
        environment = %config.environment,
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let registry = Arc::new(build_registry(&config).context("Invalid provider setup")?);

    let templates = TemplateEngine::with_config(TemplateConfig {
        templates_dir: config.exercises.templates_dir.clone(),
    })
    .context("Failed to load prompt templates")?;

    let state = AppState {
        exercise_service: Arc::new(ExerciseService::with_settings(
            Arc::clone(&registry),
            Arc::new(templates),
            config.exercises.to_settings(),
        )),
        transcription_service: Arc::new(TranscriptionService::with_settings(
            Arc::clone(&registry),
            config.transcription.to_settings(),
        )),
        speech_service: Arc::new(SpeechSynthesisService::with_settings(
            Arc::clone(&registry),
            config.speech.to_settings(),
        )),
        registry,
        config: Arc::new(config.clone()),
    };

    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.allowed_origins));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    match serve(listener, app, shutdown_signal(), shutdown_timeout).await? {
        ShutdownOutcome::Drained => info!("Server shutdown complete"),
        ShutdownOutcome::TimedOut => warn!("Server shutdown forced after timeout"),
    }

    Ok(())
}

/// Allow all origins when none are configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
