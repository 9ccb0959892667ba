//! Read-only presentation of the loaded month's workout collection.
//!
//! Display identifiers are 1-based positions in the collection, stable only
//! within one render call; they are never persisted. The collection renders
//! in insertion order (chronological order of creation within the month),
//! not sorted by date.

use chrono::NaiveDate;

use fit_core::entities::Workout;
use fit_core::errors::CoreError;
use fit_core::manager::WorkoutManager;

use crate::table;

/// Resolve a display identifier back to its workout.
///
/// # Errors
///
/// `CoreError::IndexOutOfRange` when `id` is outside `[1, size]`, for every
/// size including zero.
pub fn workout_by_display_id(manager: &WorkoutManager, id: usize) -> Result<&Workout, CoreError> {
    let size = manager.len();
    if id == 0 || id > size {
        return Err(CoreError::IndexOutOfRange { index: id, size });
    }
    Ok(&manager.workouts()[id - 1])
}

/// Render the month's log, optionally filtered to one date. Filtering hides
/// rows but never renumbers them.
#[must_use]
pub fn render(manager: &WorkoutManager, filter: Option<NaiveDate>) -> String {
    let rows: Vec<Vec<String>> = manager
        .workouts()
        .iter()
        .enumerate()
        .filter(|(_, workout)| filter.is_none_or(|date| workout.start().date() == date))
        .map(|(index, workout)| {
            vec![
                (index + 1).to_string(),
                workout.name().to_string(),
                workout.start().format("%d/%m/%y").to_string(),
                format!("{} min", workout.duration_min()),
                join_tags(workout),
            ]
        })
        .collect();

    if rows.is_empty() {
        return "No workouts to show.".to_string();
    }

    table::render(&["#", "name", "date", "duration", "tags"], &rows)
}

/// Detailed single-workout view with per-exercise set lists.
#[must_use]
pub fn render_detail(workout: &Workout) -> String {
    let mut lines = vec![
        format!("Workout: {}", workout.name()),
        format!("Date: {}", workout.date_string()),
        format!(
            "Duration: {}",
            if workout.is_open() {
                "still open".to_string()
            } else {
                format!("{} min", workout.duration_min())
            }
        ),
        format!("Tags: {}", join_tags(workout)),
    ];

    if workout.exercises().is_empty() {
        lines.push("No exercises recorded.".to_string());
    } else {
        for exercise in workout.exercises() {
            let sets = exercise
                .sets()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("  - {}: [{sets}] reps", exercise.name()));
        }
    }

    lines.join("\n")
}

fn join_tags(workout: &Workout) -> String {
    if workout.display_tags().is_empty() {
        "-".to_string()
    } else {
        workout
            .display_tags()
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}
