//! Domain layer for Language Coach
//!
//! Contains the learner-facing vocabulary: providers, capabilities, exercise
//! entities, transcription and speech results, and domain errors.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
