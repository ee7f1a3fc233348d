//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod ai_client_port;
mod prompt_port;

#[cfg(test)]
pub use ai_client_port::MockAiClientPort;
pub use ai_client_port::{
    AiClientPort, CompletionOutput, SamplingParams, SpeechRequest, StructuredCompletionRequest,
};
#[cfg(test)]
pub use prompt_port::MockPromptPort;
pub use prompt_port::PromptPort;
