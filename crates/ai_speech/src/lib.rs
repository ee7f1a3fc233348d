//! AI Speech - Speech-to-Text and Text-to-Speech transports
//!
//! Provides traits and an OpenAI-compatible implementation for speech
//! processing:
//! - `SpeechToText` - Transcribe a staged audio file to text (STT)
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! Groq exposes the same transcription endpoint as OpenAI, so one provider
//! type serves both; only the base URL differs.

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::SpeechConfig;
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::openai::OpenAiSpeechProvider;
pub use types::{AudioData, AudioFormat, SynthesisRequest, Transcription};
