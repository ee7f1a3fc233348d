//! Application services - Use case implementations

mod exercise_schema;
mod exercise_service;
mod provider_registry;
mod speech_synthesis_service;
mod structured_completion;
mod transcription_service;

pub use exercise_schema::{DraftBatch, GradedBatch, SinglePhaseBatch};
pub use exercise_service::{ExerciseService, ExerciseSettings, GenerationMode};
pub use provider_registry::{ModelBinding, ProviderRegistry, ProviderRegistryBuilder};
pub use speech_synthesis_service::{
    DEFAULT_SPEED, MAX_CHUNK_CHARS, MAX_SPEED, MIN_SPEED, SpeechSettings, SpeechSynthesisService,
    SynthesisCommand,
};
pub use structured_completion::{Completed, StructuredCompletionInvoker, StructuredOutput};
pub use transcription_service::{TranscriptionService, TranscriptionSettings};
