//! Synthesized speech

use serde::{Deserialize, Serialize};

/// Audio for one chunk of one input text
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechChunk {
    /// Archive entry name, `"{text}-{chunk}.mp3"`
    pub name: String,
    pub text: String,
    pub audio: Vec<u8>,
}

impl std::fmt::Debug for SpeechChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechChunk")
            .field("name", &self.name)
            .field("text", &self.text)
            .field("audio_len", &self.audio.len())
            .finish()
    }
}

impl SpeechChunk {
    pub fn new(text_index: usize, chunk_index: usize, text: impl Into<String>, audio: Vec<u8>) -> Self {
        Self {
            name: Self::file_name(text_index, chunk_index),
            text: text.into(),
            audio,
        }
    }

    /// Entry name for the chunk at `(text_index, chunk_index)`
    #[must_use]
    pub fn file_name(text_index: usize, chunk_index: usize) -> String {
        format!("{text_index}-{chunk_index}.mp3")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_encodes_indices() {
        assert_eq!(SpeechChunk::file_name(0, 0), "0-0.mp3");
        assert_eq!(SpeechChunk::file_name(3, 12), "3-12.mp3");
    }

    #[test]
    fn new_sets_name() {
        let chunk = SpeechChunk::new(1, 2, "Hola", vec![1, 2, 3]);
        assert_eq!(chunk.name, "1-2.mp3");
        assert_eq!(chunk.audio.len(), 3);
    }
}
