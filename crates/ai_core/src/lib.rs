//! AI Core - Chat completion engines
//!
//! Provides the transport for structured chat completions against any
//! OpenAI-compatible API (OpenAI itself, Groq). Requests carry a JSON schema
//! in `response_format` so the model is constrained to a decodable shape.

pub mod config;
pub mod error;
pub mod openai;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use openai::OpenAiCompatibleEngine;
pub use ports::{
    ChatMessage, CompletionChoice, CompletionRequest, CompletionResponse, InferenceEngine,
    JsonSchemaFormat, ResponseFormat, TokenUsage,
};
