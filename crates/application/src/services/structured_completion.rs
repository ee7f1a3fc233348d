//! Structured completion invoker
//!
//! Sends one schema-constrained prompt to a resolved model and decodes the
//! first choice into a typed value. A response without a decodable first
//! choice is an `EmptyResponse`; it is never retried here.

use domain::TokenUsage;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{AiClientPort, SamplingParams, StructuredCompletionRequest};

/// A type the model can be asked to produce
pub trait StructuredOutput: DeserializeOwned + Send {
    /// Schema name reported to the provider
    const SCHEMA_NAME: &'static str;

    /// JSON schema of the serialized form
    fn json_schema() -> Value;
}

/// Decoded model output plus what it cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed<T> {
    pub value: T,
    pub usage: TokenUsage,
    /// Model reported by the provider
    pub model: String,
}

/// Stateless invoker for schema-constrained completions
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredCompletionInvoker;

impl StructuredCompletionInvoker {
    /// Run `prompt` against `model` and decode the first choice as `T`
    #[instrument(skip(self, client, prompt), fields(schema = T::SCHEMA_NAME, model = %model, prompt_len = prompt.len()))]
    pub async fn invoke<T: StructuredOutput>(
        &self,
        client: &dyn AiClientPort,
        model: &str,
        prompt: String,
        sampling: SamplingParams,
    ) -> Result<Completed<T>, ApplicationError> {
        let request = StructuredCompletionRequest {
            model: model.to_string(),
            prompt,
            schema_name: T::SCHEMA_NAME.to_string(),
            schema: T::json_schema(),
            sampling,
        };

        let output = client.complete(request).await?;

        let content = output
            .choices
            .first()
            .and_then(Option::as_deref)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                warn!(choices = output.choices.len(), "Model returned no content");
                ApplicationError::EmptyResponse(format!(
                    "No content in the response for {}",
                    T::SCHEMA_NAME
                ))
            })?;

        let value = serde_json::from_str::<T>(content).map_err(|e| {
            warn!(error = %e, "Model content does not match the schema");
            ApplicationError::EmptyResponse(format!(
                "Content does not match {}: {e}",
                T::SCHEMA_NAME
            ))
        })?;

        debug!(
            provider_model = %output.model,
            prompt_tokens = output.usage.prompt_tokens,
            completion_tokens = output.usage.completion_tokens,
            "Structured completion decoded"
        );

        Ok(Completed {
            value,
            usage: output.usage,
            model: output.model,
        })
    }
}
