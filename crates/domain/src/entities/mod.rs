//! Domain entities

mod exercise;
mod speech;
mod transcription;

pub use exercise::{
    BLANK_MIN_LEN, ExerciseAnswer, ExerciseDraft, ExerciseHint, ExerciseRequest,
    GradedExercise, MAX_EXERCISES_PER_REQUEST, blank_count, blank_spans, reveals_answer,
};
pub use speech::SpeechChunk;
pub use transcription::{AudioUpload, TranscriptionResult};
