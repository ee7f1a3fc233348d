//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};

use crate::{handlers, middleware::request_id, state::AppState};

/// Create the main router with all routes
///
/// Audio uploads get `server.max_upload_bytes`, every other body
/// `server.max_json_bytes`.
pub fn create_router(state: AppState) -> Router {
    let max_json = state.config.server.max_json_bytes;
    let max_upload = state.config.server.max_upload_bytes;

    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Learner API
        .route(
            "/api/exercises",
            post(handlers::exercises::generate_exercises).layer(DefaultBodyLimit::max(max_json)),
        )
        .route(
            "/api/speech-to-text",
            post(handlers::speech_to_text::speech_to_text)
                .layer(DefaultBodyLimit::max(max_upload)),
        )
        .route(
            "/api/text-to-speech",
            post(handlers::text_to_speech::text_to_speech).layer(DefaultBodyLimit::max(max_json)),
        )
        .layer(from_fn(request_id))
        .with_state(state)
}
