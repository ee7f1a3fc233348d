//! Property-based tests for exercise invariants
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{
    ExerciseAnswer, GradedExercise, TokenUsage, blank_count, reveals_answer,
};
use proptest::prelude::*;

fn sentence_with_blanks(words: &[String], blanks: usize) -> String {
    let mut text = String::new();
    for (i, word) in words.iter().enumerate() {
        text.push_str(word);
        text.push(' ');
        if i < blanks {
            text.push_str("___ ");
        }
    }
    for _ in words.len()..blanks {
        text.push_str("___ ");
    }
    text
}

// ============================================================================
// Blank marker tests
// ============================================================================

mod blank_tests {
    use super::*;

    proptest! {
        #[test]
        fn blank_count_matches_inserted_markers(
            words in prop::collection::vec("[a-zA-Z]{1,8}", 0..10),
            blanks in 0usize..8
        ) {
            let text = sentence_with_blanks(&words, blanks);
            prop_assert_eq!(blank_count(&text), blanks);
        }

        #[test]
        fn text_without_underscores_has_no_blanks(text in "[^_]{0,64}") {
            prop_assert_eq!(blank_count(&text), 0);
        }
    }
}

// ============================================================================
// Base form rendering tests
// ============================================================================

mod base_form_tests {
    use super::*;

    proptest! {
        #[test]
        fn rendered_annotation_never_reveals_answer(
            answer in "[a-z]{1,6}( [a-z]{1,6})?",
            base_form in "[a-z]{1,6}( [a-z]{1,6}){0,2}"
        ) {
            let exercise = GradedExercise {
                text: "Start ___ end".to_string(),
                answers: vec![ExerciseAnswer {
                    position: 0,
                    answer: answer.clone(),
                    explanation: String::new(),
                    base_form: Some(base_form.clone()),
                }],
                hints: vec![],
            };
            let rendered = exercise.render_base_forms();
            let annotation = rendered
                .strip_prefix("Start ___")
                .and_then(|rest| rest.strip_suffix(" end"))
                .unwrap_or_default();
            prop_assert!(!reveals_answer(annotation, &answer));
        }

        #[test]
        fn rendering_preserves_blank_count(
            words in prop::collection::vec("[a-z]{1,8}", 1..6),
            blanks in 1usize..5
        ) {
            let text = sentence_with_blanks(&words, blanks);
            let answers = (0..blanks)
                .map(|p| ExerciseAnswer {
                    position: u32::try_from(p).unwrap(),
                    answer: "zzz".to_string(),
                    explanation: String::new(),
                    base_form: Some("base".to_string()),
                })
                .collect();
            let exercise = GradedExercise { text, answers, hints: vec![] };
            prop_assert!(exercise.is_consistent());
            prop_assert_eq!(blank_count(&exercise.render_base_forms()), blanks);
        }
    }
}

// ============================================================================
// Token usage tests
// ============================================================================

mod usage_tests {
    use super::*;

    proptest! {
        #[test]
        fn sum_is_component_wise(
            parts in prop::collection::vec((0u64..1_000_000, 0u64..1_000_000), 0..8)
        ) {
            let total: TokenUsage = parts.iter().map(|(p, c)| TokenUsage::new(*p, *c)).sum();
            prop_assert_eq!(total.prompt_tokens, parts.iter().map(|(p, _)| p).sum::<u64>());
            prop_assert_eq!(total.completion_tokens, parts.iter().map(|(_, c)| c).sum::<u64>());
        }
    }
}
