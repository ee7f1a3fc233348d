//! Uploaded audio and its transcript

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// An uploaded audio file awaiting transcription
#[derive(Clone, PartialEq, Eq)]
pub struct AudioUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for AudioUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioUpload")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl AudioUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Extension after the last dot, without the dot
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        (!ext.is_empty() && !ext.contains(['/', '\\'])).then_some(ext)
    }

    /// Check that the upload can be staged: non-empty body and a file extension
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.bytes.is_empty() {
            return Err(DomainError::validation(format!(
                "File must not be empty: {}",
                self.filename
            )));
        }
        if self.extension().is_none() {
            return Err(DomainError::validation(format!(
                "File must have an extension: {}",
                self.filename
            )));
        }
        Ok(())
    }
}

/// Transcript of one audio file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub filename: Option<String>,
    /// Language tag supplied by the caller
    pub language: String,
    pub text: String,
}
