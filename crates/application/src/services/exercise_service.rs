//! Exercise service - Prompt, invoke and post-process exercise batches
//!
//! Two-phase generation is the default: a high-temperature call drafts the
//! exercise texts, then a provider-default call grades every draft with
//! answers, explanations, base forms and hints. Token usage of both calls is
//! summed before it is logged.

use std::{fmt, sync::Arc};

use domain::{Capability, ExerciseRequest, GradedExercise, TokenUsage};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::exercise_schema::{DraftBatch, GradedBatch, SinglePhaseBatch};
use super::provider_registry::{ModelBinding, ProviderRegistry};
use super::structured_completion::StructuredCompletionInvoker;
use crate::{
    error::ApplicationError,
    ports::{PromptPort, SamplingParams},
};

/// How exercises are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Draft, then grade
    #[default]
    TwoPhase,
    /// One call producing everything (deprecated)
    SinglePhase,
}

/// Sampling and mode settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseSettings {
    pub mode: GenerationMode,
    pub draft_sampling: SamplingParams,
    pub grading_sampling: SamplingParams,
    pub single_phase_sampling: SamplingParams,
}

impl Default for ExerciseSettings {
    fn default() -> Self {
        Self {
            mode: GenerationMode::TwoPhase,
            draft_sampling: SamplingParams::new(1.75, 0.95),
            grading_sampling: SamplingParams::PROVIDER_DEFAULT,
            single_phase_sampling: SamplingParams::new(1.0, 0.95),
        }
    }
}

/// Service generating graded fill-in-the-blank exercises
pub struct ExerciseService {
    registry: Arc<ProviderRegistry>,
    prompts: Arc<dyn PromptPort>,
    invoker: StructuredCompletionInvoker,
    settings: ExerciseSettings,
}

impl fmt::Debug for ExerciseService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExerciseService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ExerciseService {
    pub fn new(registry: Arc<ProviderRegistry>, prompts: Arc<dyn PromptPort>) -> Self {
        Self::with_settings(registry, prompts, ExerciseSettings::default())
    }

    pub fn with_settings(
        registry: Arc<ProviderRegistry>,
        prompts: Arc<dyn PromptPort>,
        settings: ExerciseSettings,
    ) -> Self {
        Self {
            registry,
            prompts,
            invoker: StructuredCompletionInvoker,
            settings,
        }
    }

    /// Generate `request.total` graded exercises
    #[instrument(
        skip(self, request),
        fields(
            provider = %request.provider,
            difficulty = %request.difficulty,
            total = request.total,
            mode = ?self.settings.mode
        )
    )]
    pub async fn generate(
        &self,
        request: &ExerciseRequest,
    ) -> Result<Vec<GradedExercise>, ApplicationError> {
        let binding = self
            .registry
            .resolve(request.provider, Capability::TextGeneration)?;

        let (raw, usage) = match self.settings.mode {
            GenerationMode::TwoPhase => self.generate_two_phase(&binding, request).await?,
            GenerationMode::SinglePhase => self.generate_single_phase(&binding, request).await?,
        };

        let exercises = Self::post_process(raw, request)?;

        info!(
            provider = %binding.provider,
            model = %binding.model,
            exercise_language = %request.exercise_language,
            user_language = %request.user_language,
            topic = %request.topic,
            exercises = exercises.len(),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Generated exercises"
        );

        Ok(exercises)
    }

    async fn generate_two_phase(
        &self,
        binding: &ModelBinding,
        request: &ExerciseRequest,
    ) -> Result<(Vec<GradedExercise>, TokenUsage), ApplicationError> {
        let draft_prompt = self.prompts.draft_prompt(request)?;
        let drafted = self
            .invoker
            .invoke::<DraftBatch>(
                binding.client.as_ref(),
                &binding.model,
                draft_prompt,
                self.settings.draft_sampling,
            )
            .await?;

        let drafts = drafted.value.into_drafts();
        if drafts.is_empty() {
            return Err(ApplicationError::EmptyResponse(
                "Model drafted no exercises".to_string(),
            ));
        }

        let grading_prompt = self.prompts.grading_prompt(request, &drafts)?;
        let graded = self
            .invoker
            .invoke::<GradedBatch>(
                binding.client.as_ref(),
                &binding.model,
                grading_prompt,
                self.settings.grading_sampling,
            )
            .await?;

        Ok((graded.value.into_exercises(), drafted.usage + graded.usage))
    }

    async fn generate_single_phase(
        &self,
        binding: &ModelBinding,
        request: &ExerciseRequest,
    ) -> Result<(Vec<GradedExercise>, TokenUsage), ApplicationError> {
        let prompt = self.prompts.single_phase_prompt(request)?;
        let completed = self
            .invoker
            .invoke::<SinglePhaseBatch>(
                binding.client.as_ref(),
                &binding.model,
                prompt,
                self.settings.single_phase_sampling,
            )
            .await?;

        Ok((completed.value.into_exercises(), completed.usage))
    }

    /// Drop inconsistent exercises, apply the base form and hint flags, cap the count
    fn post_process(
        raw: Vec<GradedExercise>,
        request: &ExerciseRequest,
    ) -> Result<Vec<GradedExercise>, ApplicationError> {
        let received = raw.len();
        let limit = usize::try_from(request.total).unwrap_or(usize::MAX);

        let exercises: Vec<GradedExercise> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, exercise)| {
                if exercise.is_consistent() {
                    Some(exercise)
                } else {
                    warn!(
                        index,
                        blanks = exercise.blank_count(),
                        positions = ?exercise.referenced_positions(),
                        "Dropping exercise with inconsistent answer positions"
                    );
                    None
                }
            })
            .take(limit)
            .map(|exercise| Self::apply_flags(exercise, request))
            .collect();

        if exercises.is_empty() {
            return Err(ApplicationError::EmptyResponse(format!(
                "None of the {received} generated exercises were usable"
            )));
        }
        if exercises.len() < limit {
            warn!(
                requested = limit,
                returned = exercises.len(),
                "Model returned fewer exercises than requested"
            );
        }

        Ok(exercises)
    }

    fn apply_flags(exercise: GradedExercise, request: &ExerciseRequest) -> GradedExercise {
        let mut exercise = if request.include_base_form {
            exercise.with_rendered_base_forms()
        } else {
            exercise
        };
        for answer in &mut exercise.answers {
            answer.base_form = None;
        }
        if !request.include_hints {
            exercise.hints.clear();
        }
        exercise
    }
}
