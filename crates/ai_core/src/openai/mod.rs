//! OpenAI-compatible chat completions
//!
//! Works against any endpoint implementing `POST {base}/chat/completions`,
//! including Groq's `https://api.groq.com/openai/v1`.

mod client;

pub use client::OpenAiCompatibleEngine;
