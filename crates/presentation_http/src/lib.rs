//! Language Coach HTTP presentation layer
//!
//! This crate provides the HTTP API: exercise generation, speech-to-text,
//! text-to-speech and health endpoints.

pub mod archive;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use middleware::{RequestId, ValidatedJson};
pub use routes::create_router;
pub use server::{ShutdownOutcome, serve};
pub use state::AppState;
