//! Output shapes the model is asked to produce for exercises

use std::collections::HashMap;

use domain::{ExerciseAnswer, ExerciseDraft, ExerciseHint, GradedExercise};
use serde::Deserialize;
use serde_json::{Value, json};

use super::structured_completion::StructuredOutput;

fn answer_schema(with_exercise_id: bool) -> Value {
    let mut properties = json!({
        "position": {"type": "integer", "minimum": 0},
        "answer": {"type": "string"},
        "explanation": {"type": "string"},
        "baseForm": {"type": ["string", "null"]}
    });
    let mut required = vec!["position", "answer", "explanation", "baseForm"];
    if with_exercise_id {
        properties["exerciseId"] = json!({"type": "integer", "minimum": 0});
        required.insert(0, "exerciseId");
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

fn hint_schema(with_exercise_id: bool) -> Value {
    let mut properties = json!({
        "evidence": {"type": "integer", "minimum": 0, "maximum": 100},
        "hint": {"type": "string"}
    });
    let mut required = vec!["evidence", "hint"];
    if with_exercise_id {
        properties["exerciseId"] = json!({"type": "integer", "minimum": 0});
        required.insert(0, "exerciseId");
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Phase one: raw exercise texts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DraftBatch {
    pub exercises: Vec<String>,
}

impl StructuredOutput for DraftBatch {
    const SCHEMA_NAME: &'static str = "exercise_drafts";

    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "exercises": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["exercises"],
            "additionalProperties": false
        })
    }
}

impl DraftBatch {
    /// Non-blank drafts, each folded onto a single line
    pub fn into_drafts(self) -> Vec<ExerciseDraft> {
        self.exercises
            .iter()
            .map(String::as_str)
            .map(single_line)
            .filter(|text| !text.is_empty())
            .map(ExerciseDraft::new)
            .collect()
    }
}

/// Join the trimmed non-empty lines of `text` with single spaces
fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerItem {
    pub position: u32,
    pub answer: String,
    pub explanation: String,
    #[serde(default)]
    pub base_form: Option<String>,
}

impl From<AnswerItem> for ExerciseAnswer {
    fn from(item: AnswerItem) -> Self {
        Self {
            position: item.position,
            answer: item.answer,
            explanation: item.explanation,
            base_form: item.base_form,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HintItem {
    pub evidence: i64,
    pub hint: String,
}

impl From<HintItem> for ExerciseHint {
    fn from(item: HintItem) -> Self {
        Self::new(item.evidence, item.hint)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GradedItem {
    pub exercise: String,
    pub answers: Vec<AnswerItem>,
    #[serde(default)]
    pub hints: Vec<HintItem>,
}

/// Phase two: answers and hints for every draft
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GradedBatch {
    pub exercises: Vec<GradedItem>,
}

impl StructuredOutput for GradedBatch {
    const SCHEMA_NAME: &'static str = "graded_exercises";

    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "exercises": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "exercise": {"type": "string"},
                            "answers": {"type": "array", "items": answer_schema(false)},
                            "hints": {"type": "array", "items": hint_schema(false)}
                        },
                        "required": ["exercise", "answers", "hints"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["exercises"],
            "additionalProperties": false
        })
    }
}

impl GradedBatch {
    pub fn into_exercises(self) -> Vec<GradedExercise> {
        self.exercises
            .into_iter()
            .map(|item| GradedExercise {
                text: item.exercise,
                answers: item.answers.into_iter().map(Into::into).collect(),
                hints: item.hints.into_iter().map(Into::into).collect(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglePhaseExercise {
    pub exercise_id: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglePhaseAnswer {
    pub exercise_id: u32,
    #[serde(flatten)]
    pub answer: AnswerItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglePhaseHint {
    pub exercise_id: u32,
    #[serde(flatten)]
    pub hint: HintItem,
}

/// One-shot output: exercises, answers and hints linked by `exerciseId`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SinglePhaseBatch {
    pub exercises: Vec<SinglePhaseExercise>,
    pub answers: Vec<SinglePhaseAnswer>,
    #[serde(default)]
    pub hints: Vec<SinglePhaseHint>,
}

impl StructuredOutput for SinglePhaseBatch {
    const SCHEMA_NAME: &'static str = "exercises";

    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "exercises": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "exerciseId": {"type": "integer", "minimum": 0},
                            "text": {"type": "string"}
                        },
                        "required": ["exerciseId", "text"],
                        "additionalProperties": false
                    }
                },
                "answers": {"type": "array", "items": answer_schema(true)},
                "hints": {"type": "array", "items": hint_schema(true)}
            },
            "required": ["exercises", "answers", "hints"],
            "additionalProperties": false
        })
    }
}

impl SinglePhaseBatch {
    /// Group answers and hints under their exercise, keeping exercise order
    pub fn into_exercises(self) -> Vec<GradedExercise> {
        let mut answers: HashMap<u32, Vec<ExerciseAnswer>> = HashMap::new();
        for item in self.answers {
            answers.entry(item.exercise_id).or_default().push(item.answer.into());
        }
        let mut hints: HashMap<u32, Vec<ExerciseHint>> = HashMap::new();
        for item in self.hints {
            hints.entry(item.exercise_id).or_default().push(item.hint.into());
        }

        self.exercises
            .into_iter()
            .map(|exercise| GradedExercise {
                answers: answers.remove(&exercise.exercise_id).unwrap_or_default(),
                hints: hints.remove(&exercise.exercise_id).unwrap_or_default(),
                text: exercise.text,
            })
            .collect()
    }
}
