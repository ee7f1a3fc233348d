//! Speech synthesis service - Turn nested text chunks into MP3 files
//!
//! Input is a list of texts, each split into chunks by the caller. Every chunk
//! becomes one MP3 named `"{text}-{chunk}.mp3"` from its zero-based indices.
//! Chunks are synthesized with bounded concurrency; the output keeps the
//! input nesting and order.

use std::{fmt, sync::Arc};

use domain::{AiProvider, Capability, SpeechChunk};
use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::provider_registry::ProviderRegistry;
use crate::{error::ApplicationError, ports::SpeechRequest};

/// Slowest playback speed providers accept
pub const MIN_SPEED: f32 = 0.25;
/// Fastest playback speed providers accept
pub const MAX_SPEED: f32 = 4.0;
/// Speed used when the caller sends none
pub const DEFAULT_SPEED: f32 = 1.0;
/// Longest chunk, in characters, a provider accepts per call
pub const MAX_CHUNK_CHARS: usize = 4096;

/// Synthesis defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Provider used when a request names none
    pub default_provider: AiProvider,
    /// Voice id, provider default when unset
    pub voice: Option<String>,
    /// Chunks synthesized at the same time
    pub max_concurrency: usize,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            default_provider: AiProvider::OpenAi,
            voice: Some("alloy".to_string()),
            max_concurrency: 4,
        }
    }
}

/// A text-to-speech job
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisCommand {
    /// Texts, each a list of chunks
    pub texts: Vec<Vec<String>>,
    /// Free-form voice direction
    pub instructions: Option<String>,
    pub speed: Option<f32>,
    pub provider: Option<AiProvider>,
}

impl SynthesisCommand {
    pub fn new(texts: Vec<Vec<String>>) -> Self {
        Self {
            texts,
            ..Self::default()
        }
    }

    fn chunk_count(&self) -> usize {
        self.texts.iter().map(Vec::len).sum()
    }
}

/// Service synthesizing speech for chunked texts
pub struct SpeechSynthesisService {
    registry: Arc<ProviderRegistry>,
    settings: SpeechSettings,
}

impl fmt::Debug for SpeechSynthesisService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechSynthesisService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SpeechSynthesisService {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self::with_settings(registry, SpeechSettings::default())
    }

    pub fn with_settings(registry: Arc<ProviderRegistry>, settings: SpeechSettings) -> Self {
        Self { registry, settings }
    }

    pub fn settings(&self) -> &SpeechSettings {
        &self.settings
    }

    /// Synthesize every chunk of every text
    ///
    /// Input is validated and the provider resolved before any call is made.
    /// The first failing chunk fails the whole job.
    #[instrument(skip(self, command), fields(texts = command.texts.len(), chunks = command.chunk_count()))]
    pub async fn synthesize(
        &self,
        command: SynthesisCommand,
    ) -> Result<Vec<Vec<SpeechChunk>>, ApplicationError> {
        let speed = validate_speed(command.speed)?;
        validate_texts(&command.texts)?;

        let provider = command.provider.unwrap_or(self.settings.default_provider);
        let binding = self.registry.resolve(provider, Capability::TextToSpeech)?;
        let instructions = command
            .instructions
            .filter(|i| !i.trim().is_empty());

        let text_count = command.texts.len();
        let jobs: Vec<(usize, usize, String)> = command
            .texts
            .into_iter()
            .enumerate()
            .flat_map(|(i, chunks)| {
                chunks
                    .into_iter()
                    .enumerate()
                    .map(move |(j, text)| (i, j, text))
            })
            .collect();
        let concurrency = self.settings.max_concurrency.max(1);

        let chunks: Vec<(usize, SpeechChunk)> = stream::iter(jobs)
            .map(|(i, j, text)| {
                let request = SpeechRequest {
                    model: binding.model.clone(),
                    text: text.clone(),
                    voice: self.settings.voice.clone(),
                    instructions: instructions.clone(),
                    speed,
                };
                let client = Arc::clone(&binding.client);
                async move {
                    let audio = client
                        .synthesize(request)
                        .await
                        .map_err(|e| ApplicationError::batch_item(SpeechChunk::file_name(i, j), e))?;
                    debug!(text = i, chunk = j, bytes = audio.len(), "Synthesized chunk");
                    Ok::<_, ApplicationError>((i, SpeechChunk::new(i, j, text, audio)))
                }
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        let mut grouped: Vec<Vec<SpeechChunk>> = (0..text_count).map(|_| Vec::new()).collect();
        for (i, chunk) in chunks {
            grouped[i].push(chunk);
        }

        info!(
            %provider,
            model = %binding.model,
            files = grouped.iter().map(Vec::len).sum::<usize>(),
            "Synthesized speech"
        );

        Ok(grouped)
    }
}

fn validate_speed(speed: Option<f32>) -> Result<f32, ApplicationError> {
    let speed = speed.unwrap_or(DEFAULT_SPEED);
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(ApplicationError::Validation(format!(
            "Speed must be between {MIN_SPEED} and {MAX_SPEED}, got {speed}"
        )));
    }
    Ok(speed)
}

fn validate_texts(texts: &[Vec<String>]) -> Result<(), ApplicationError> {
    if texts.iter().all(Vec::is_empty) {
        return Err(ApplicationError::Validation(
            "At least one text chunk is required".to_string(),
        ));
    }
    for (i, chunks) in texts.iter().enumerate() {
        for (j, chunk) in chunks.iter().enumerate() {
            if chunk.trim().is_empty() {
                return Err(ApplicationError::Validation(format!(
                    "Chunk {j} of text {i} is empty"
                )));
            }
            let chars = chunk.chars().count();
            if chars > MAX_CHUNK_CHARS {
                return Err(ApplicationError::Validation(format!(
                    "Chunk {j} of text {i} has {chars} characters, limit is {MAX_CHUNK_CHARS}"
                )));
            }
        }
    }
    Ok(())
}
