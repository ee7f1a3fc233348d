//! Fill-in-the-blank exercises
//!
//! An exercise text marks every gap with a blank marker: a run of three or
//! more underscores. Blanks are numbered from zero in reading order, and each
//! answer refers to its blank by that position.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;
use validator::Validate;

use crate::{AiProvider, ExerciseDifficulty};

/// Minimum run of underscores recognised as a blank
pub const BLANK_MIN_LEN: usize = 3;

/// Upper bound for exercises requested in one call
pub const MAX_EXERCISES_PER_REQUEST: u32 = 50;

/// A learner's request for a batch of exercises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRequest {
    pub provider: AiProvider,
    /// Language the exercises are written in
    #[validate(length(min = 1, max = 64, message = "must be between 1 and 64 characters"))]
    pub exercise_language: String,
    /// Language used for explanations and hints
    #[validate(length(min = 1, max = 64, message = "must be between 1 and 64 characters"))]
    pub user_language: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub topic: String,
    /// Number of exercises to produce
    #[validate(range(min = 1, max = 50, message = "must be between 1 and 50"))]
    pub total: u32,
    pub difficulty: ExerciseDifficulty,
    #[serde(default)]
    pub include_base_form: bool,
    #[serde(default)]
    pub include_hints: bool,
}

/// Byte ranges of every blank marker in `text`, in reading order
pub fn blank_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = None;

    for (idx, ch) in text.char_indices() {
        match (ch == '_', start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                if idx - s >= BLANK_MIN_LEN {
                    spans.push(s..idx);
                }
                start = None;
            },
            _ => {},
        }
    }
    if let Some(s) = start {
        if text.len() - s >= BLANK_MIN_LEN {
            spans.push(s..text.len());
        }
    }

    spans
}

/// Number of blank markers in `text`
pub fn blank_count(text: &str) -> usize {
    blank_spans(text).len()
}

/// Phase-one output: an exercise text with blanks and no answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    pub text: String,
}

impl ExerciseDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn blank_count(&self) -> usize {
        blank_count(&self.text)
    }
}

/// One accepted answer for a blank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseAnswer {
    /// Zero-based blank index
    pub position: u32,
    pub answer: String,
    pub explanation: String,
    /// Uninflected form shown next to the blank, if requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_form: Option<String>,
}

/// A hint with the model's confidence in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseHint {
    /// Confidence from 0 to 100
    pub evidence: u8,
    pub hint: String,
}

impl ExerciseHint {
    /// Build a hint, clamping evidence into 0..=100
    pub fn new(evidence: i64, hint: impl Into<String>) -> Self {
        let clamped = evidence.clamp(0, 100);
        Self {
            evidence: u8::try_from(clamped).unwrap_or(100),
            hint: hint.into(),
        }
    }
}

/// A finished exercise with answers and hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedExercise {
    pub text: String,
    pub answers: Vec<ExerciseAnswer>,
    #[serde(default)]
    pub hints: Vec<ExerciseHint>,
}

impl GradedExercise {
    #[must_use]
    pub fn blank_count(&self) -> usize {
        blank_count(&self.text)
    }

    /// Distinct positions referenced by the answers
    #[must_use]
    pub fn referenced_positions(&self) -> BTreeSet<u32> {
        self.answers.iter().map(|a| a.position).collect()
    }

    /// True when the answers cover exactly the blanks `0..blank_count`
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let blanks = self.blank_count();
        if blanks == 0 {
            return false;
        }
        let positions = self.referenced_positions();
        positions.len() == blanks
            && positions
                .iter()
                .zip(0u32..)
                .all(|(position, expected)| *position == expected)
    }

    /// First non-empty base form given for `position`
    #[must_use]
    pub fn base_form_for(&self, position: u32) -> Option<&str> {
        self.answers
            .iter()
            .filter(|a| a.position == position)
            .find_map(|a| a.base_form.as_deref().map(str::trim).filter(|bf| !bf.is_empty()))
    }

    /// Text with `___` replaced by `___ (base form)` for every blank that has one
    ///
    /// An annotation is dropped when it would reveal one of the answers for its
    /// blank.
    #[must_use]
    pub fn render_base_forms(&self) -> String {
        let mut rendered = String::with_capacity(self.text.len() + 16);
        let mut cursor = 0;

        for (span, position) in blank_spans(&self.text).into_iter().zip(0u32..) {
            rendered.push_str(&self.text[cursor..span.end]);
            if let Some(base_form) = self.base_form_for(position) {
                let leaks = self
                    .answers
                    .iter()
                    .filter(|a| a.position == position)
                    .any(|a| reveals_answer(base_form, &a.answer));
                if !leaks {
                    rendered.push_str(" (");
                    rendered.push_str(base_form);
                    rendered.push(')');
                }
            }
            cursor = span.end;
        }
        rendered.push_str(&self.text[cursor..]);

        rendered
    }

    /// Replace the text with its base-form rendering
    #[must_use]
    pub fn with_rendered_base_forms(mut self) -> Self {
        self.text = self.render_base_forms();
        self
    }
}

fn words(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `annotation` contains `answer` as a whole-word sequence
pub fn reveals_answer(annotation: &str, answer: &str) -> bool {
    let answer_words = words(answer);
    if answer_words.is_empty() {
        return false;
    }
    words(annotation)
        .windows(answer_words.len())
        .any(|window| window == answer_words.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(position: u32, answer: &str, base_form: Option<&str>) -> ExerciseAnswer {
        ExerciseAnswer {
            position,
            answer: answer.to_string(),
            explanation: String::new(),
            base_form: base_form.map(String::from),
        }
    }

    fn exercise(text: &str, answers: Vec<ExerciseAnswer>) -> GradedExercise {
        GradedExercise {
            text: text.to_string(),
            answers,
            hints: vec![],
        }
    }

    #[test]
    fn finds_blanks_in_order() {
        let text = "Ich ___ nach Hause und ___ dann.";
        assert_eq!(blank_spans(text), vec![4..7, 21..24]);
    }

    #[test]
    fn short_underscore_runs_are_not_blanks() {
        assert_eq!(blank_count("snake_case __ and ___"), 1);
    }

    #[test]
    fn long_runs_count_once() {
        assert_eq!(blank_count("a ______ b"), 1);
    }

    #[test]
    fn blank_at_end_of_text() {
        assert_eq!(blank_spans("end ___"), vec![4..7]);
    }

    #[test]
    fn consistent_when_positions_cover_blanks() {
        let ex = exercise(
            "I ___ to the ___.",
            vec![answer(0, "went", None), answer(1, "shop", None), answer(1, "store", None)],
        );
        assert!(ex.is_consistent());
    }

    #[test]
    fn inconsistent_when_position_missing() {
        let ex = exercise("I ___ to the ___.", vec![answer(0, "went", None)]);
        assert!(!ex.is_consistent());
    }

    #[test]
    fn inconsistent_when_position_out_of_range() {
        let ex = exercise("I ___ home.", vec![answer(0, "went", None), answer(1, "x", None)]);
        assert!(!ex.is_consistent());
    }

    #[test]
    fn inconsistent_without_blanks() {
        let ex = exercise("No blanks.", vec![answer(0, "x", None)]);
        assert!(!ex.is_consistent());
    }

    #[test]
    fn renders_base_form_per_position() {
        let ex = exercise(
            "Ella ___ al mercado y ___ pan.",
            vec![answer(0, "va", Some("ir")), answer(1, "compra", Some("comprar"))],
        );
        assert_eq!(ex.render_base_forms(), "Ella ___ (ir) al mercado y ___ (comprar) pan.");
    }

    #[test]
    fn first_base_form_wins_for_shared_position() {
        let ex = exercise(
            "They ___ late.",
            vec![answer(0, "were", Some("be")), answer(0, "are", Some("to be"))],
        );
        assert_eq!(ex.render_base_forms(), "They ___ (be) late.");
    }

    #[test]
    fn leaking_base_form_is_omitted() {
        let ex = exercise("She ___ fast.", vec![answer(0, "runs", Some("Runs (run)"))]);
        assert_eq!(ex.render_base_forms(), "She ___ fast.");
    }

    #[test]
    fn whole_word_leak_is_omitted_but_substring_is_kept() {
        let ex = exercise("He ___ it.", vec![answer(0, "go", Some("to go on"))]);
        assert_eq!(ex.render_base_forms(), "He ___ it.");
        let ex = exercise("He ___ it.", vec![answer(0, "go", Some("gone"))]);
        assert_eq!(ex.render_base_forms(), "He ___ (gone) it.");
    }

    #[test]
    fn blank_without_base_form_is_untouched() {
        let ex = exercise("A ___ b ___", vec![answer(0, "x", None), answer(1, "y", Some("  "))]);
        assert_eq!(ex.render_base_forms(), "A ___ b ___");
    }

    #[test]
    fn hint_evidence_is_clamped() {
        assert_eq!(ExerciseHint::new(150, "h").evidence, 100);
        assert_eq!(ExerciseHint::new(-5, "h").evidence, 0);
        assert_eq!(ExerciseHint::new(42, "h").evidence, 42);
    }

    #[test]
    fn request_deserializes_from_camel_case() {
        let json = r#"{
            "provider": "groq",
            "exerciseLanguage": "German",
            "userLanguage": "English",
            "topic": "Perfekt",
            "total": 5,
            "difficulty": "b1",
            "includeBaseForm": true,
            "includeHints": false
        }"#;
        let req: ExerciseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.provider, AiProvider::Groq);
        assert_eq!(req.difficulty, ExerciseDifficulty::B1);
        assert!(req.include_base_form);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn request_with_zero_total_fails_validation() {
        let req = ExerciseRequest {
            provider: AiProvider::OpenAi,
            exercise_language: "French".into(),
            user_language: "English".into(),
            topic: "subjonctif".into(),
            total: 0,
            difficulty: ExerciseDifficulty::B2,
            include_base_form: false,
            include_hints: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn words_answer_check_is_case_insensitive() {
        assert!(reveals_answer("Der Hund (HUND)", "hund"));
        assert!(reveals_answer("have been", "have been"));
        assert!(!reveals_answer("have", "have been"));
        assert!(!reveals_answer("anything", ""));
    }
}
