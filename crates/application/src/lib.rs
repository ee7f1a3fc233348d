//! Application layer - Use cases and orchestration
//!
//! Contains the provider registry, the structured completion invoker and the
//! exercise, transcription and speech synthesis use cases, plus the ports
//! infrastructure adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
