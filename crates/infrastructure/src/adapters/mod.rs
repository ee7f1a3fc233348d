//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod openai_client_adapter;

pub use openai_client_adapter::{OpenAiCompatibleClient, map_inference_error, map_speech_error};
