//! Cross-cutting error types for fitlog.
//!
//! This module defines errors raised by the domain layer. Storage-specific
//! errors (`StoreError`) are defined in `fit-store`. A unified error is
//! deferred to `fit-cli` where all crate errors converge.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::enums::Modality;

/// A workout that would be given a second, contradictory modality by a
/// proposed keyword addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordConflict {
    /// Name of the conflicting workout.
    pub workout: String,
    /// The modality the workout already resolves to.
    pub existing: Modality,
}

/// Errors raised by the fitlog domain layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value was parseable but rejected by an invariant.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An operation required an open workout and none is open.
    #[error("No workout is currently open. Create one with /create_workout first")]
    NoOpenWorkout,

    /// A set was added but the open workout has no exercise yet.
    #[error("No exercise to add a set to. Add one with /add_exercise first")]
    NoOpenExercise,

    /// An end timestamp preceded the workout's start. Retryable: the
    /// workout stays open and the caller may resubmit a valid end.
    #[error("End time {end} is before the workout start {start}")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// A display identifier fell outside the rendered collection.
    #[error("Workout number {index} is out of range (1..={size})")]
    IndexOutOfRange { index: usize, size: usize },

    /// A modality keyword addition would give existing workouts two
    /// contradictory modality tags. The dictionaries are left unchanged.
    #[error(
        "Keyword '{keyword}' cannot be added to {modality}: {}",
        describe_conflicts(conflicts)
    )]
    ModalityConflict {
        keyword: String,
        modality: Modality,
        conflicts: Vec<KeywordConflict>,
    },
}

fn describe_conflicts(conflicts: &[KeywordConflict]) -> String {
    let parts = conflicts
        .iter()
        .map(|c| format!("'{}' already resolves to {}", c.workout, c.existing))
        .collect::<Vec<_>>();
    parts.join("; ")
}
