//! Prompt port - Renders the exercise prompts sent to the model

use domain::{ExerciseDraft, ExerciseRequest};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for building exercise prompts from a learner request
#[cfg_attr(test, automock)]
pub trait PromptPort: Send + Sync {
    /// Prompt for the one-shot mode producing exercises, answers and hints together
    fn single_phase_prompt(&self, request: &ExerciseRequest) -> Result<String, ApplicationError>;

    /// Phase one: exercise texts with blanks and no answers
    fn draft_prompt(&self, request: &ExerciseRequest) -> Result<String, ApplicationError>;

    /// Phase two: answers, explanations, base forms and hints for `drafts`
    fn grading_prompt(
        &self,
        request: &ExerciseRequest,
        drafts: &[ExerciseDraft],
    ) -> Result<String, ApplicationError>;
}
