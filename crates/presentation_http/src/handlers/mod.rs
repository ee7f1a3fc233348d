//! HTTP request handlers

pub mod exercises;
pub mod health;
pub mod speech_to_text;
pub mod text_to_speech;
