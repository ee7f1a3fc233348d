//! Exercise generation handler

use axum::{Json, extract::State};
use domain::{
    AiProvider, ExerciseAnswer, ExerciseDifficulty, ExerciseHint, ExerciseRequest,
    GradedExercise,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Exercise generation request body
///
/// `provider` and `difficulty` are case-insensitive tokens; unknown values
/// are rejected with `400 Bad Request`. Text fields are trimmed before the
/// `ExerciseRequest` rules run, so whitespace-only values are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisesRequest {
    pub provider: AiProvider,
    pub exercise_language: String,
    pub user_language: String,
    pub topic: String,
    pub total: u32,
    pub difficulty: ExerciseDifficulty,

    #[serde(default)]
    pub include_base_form: bool,

    #[serde(default)]
    pub include_hints: bool,
}

impl ExercisesRequest {
    /// Trimmed domain request
    pub fn to_domain(&self) -> ExerciseRequest {
        ExerciseRequest {
            provider: self.provider,
            exercise_language: self.exercise_language.trim().to_string(),
            user_language: self.user_language.trim().to_string(),
            topic: self.topic.trim().to_string(),
            total: self.total,
            difficulty: self.difficulty,
            include_base_form: self.include_base_form,
            include_hints: self.include_hints,
        }
    }
}

impl Validate for ExercisesRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.to_domain().validate()
    }
}

impl From<ExercisesRequest> for ExerciseRequest {
    fn from(body: ExercisesRequest) -> Self {
        body.to_domain()
    }
}

/// One answer of an exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub position: u32,
    pub answer: String,
    pub explanation: String,
}

impl From<ExerciseAnswer> for AnswerResponse {
    fn from(answer: ExerciseAnswer) -> Self {
        Self {
            position: answer.position,
            answer: answer.answer,
            explanation: answer.explanation,
        }
    }
}

/// One hint of an exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintResponse {
    pub evidence: u8,
    pub hint: String,
}

impl From<ExerciseHint> for HintResponse {
    fn from(hint: ExerciseHint) -> Self {
        Self {
            evidence: hint.evidence,
            hint: hint.hint,
        }
    }
}

/// A generated exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub text: String,
    pub answers: Vec<AnswerResponse>,
    pub hints: Vec<HintResponse>,
}

impl From<GradedExercise> for ExerciseResponse {
    fn from(exercise: GradedExercise) -> Self {
        Self {
            text: exercise.text,
            answers: exercise.answers.into_iter().map(Into::into).collect(),
            hints: exercise.hints.into_iter().map(Into::into).collect(),
        }
    }
}

/// Generate fill-in-the-blank exercises
pub async fn generate_exercises(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ExercisesRequest>,
) -> Result<Json<Vec<ExerciseResponse>>, ApiError> {
    let request = ExerciseRequest::from(body);
    debug!(provider = %request.provider, total = request.total, "Exercise request accepted");
    let exercises = state.exercise_service.generate(&request).await?;

    Ok(Json(exercises.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_tokens_are_case_insensitive() {
        let body: ExercisesRequest = serde_json::from_str(
            r#"{"provider":"openai","exerciseLanguage":"German","userLanguage":"English",
                "topic":"Dativ","total":3,"difficulty":"b1","includeHints":true}"#,
        )
        .unwrap();

        assert_eq!(body.provider, AiProvider::OpenAi);
        assert_eq!(body.difficulty, ExerciseDifficulty::B1);
        assert!(!body.include_base_form);
        assert!(body.include_hints);
    }

    #[test]
    fn unknown_provider_fails_to_deserialize() {
        let result = serde_json::from_str::<ExercisesRequest>(
            r#"{"provider":"mistral","exerciseLanguage":"German","userLanguage":"English",
                "topic":"Dativ","total":3,"difficulty":"B1"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn total_out_of_range_fails_validation() {
        let body: ExercisesRequest = serde_json::from_str(
            r#"{"provider":"GROQ","exerciseLanguage":"German","userLanguage":"English",
                "topic":"Dativ","total":0,"difficulty":"A1"}"#,
        )
        .unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn whitespace_only_topic_fails_validation() {
        let body: ExercisesRequest = serde_json::from_str(
            r#"{"provider":"openai","exerciseLanguage":"German","userLanguage":"English",
                "topic":"   ","total":3,"difficulty":"B1"}"#,
        )
        .unwrap();

        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("topic"));
    }

    #[test]
    fn topic_limit_applies_after_trimming() {
        let padded = format!("  {}  ", "a".repeat(200));
        let body: ExercisesRequest = serde_json::from_value(serde_json::json!({
            "provider": "openai", "exerciseLanguage": " German ", "userLanguage": "English",
            "topic": padded, "total": 3, "difficulty": "B1"
        }))
        .unwrap();
        assert!(body.validate().is_ok());
        assert_eq!(ExerciseRequest::from(body).exercise_language, "German");

        let body: ExercisesRequest = serde_json::from_value(serde_json::json!({
            "provider": "openai", "exerciseLanguage": "German", "userLanguage": "English",
            "topic": "a".repeat(201), "total": 3, "difficulty": "B1"
        }))
        .unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn response_drops_base_form() {
        let exercise = GradedExercise {
            text: "Ich ___ (sein) müde.".into(),
            answers: vec![ExerciseAnswer {
                position: 0,
                answer: "bin".into(),
                explanation: "first person".into(),
                base_form: Some("sein".into()),
            }],
            hints: vec![ExerciseHint::new(80, "to be")],
        };

        let json = serde_json::to_value(ExerciseResponse::from(exercise)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "text": "Ich ___ (sein) müde.",
                "answers": [{"position": 0, "answer": "bin", "explanation": "first person"}],
                "hints": [{"evidence": 80, "hint": "to be"}]
            })
        );
    }
}
