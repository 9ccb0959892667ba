use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A named movement within a workout, with an ordered list of set rep
/// counts. An exercise always has at least one set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    name: String,
    sets: Vec<u32>,
}

impl Exercise {
    /// Create an exercise with its first set.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the name is empty or the initial
    /// rep count is zero.
    pub fn new(name: &str, initial_reps: u32) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "exercise name cannot be empty".to_string(),
            ));
        }
        if name.contains('|') {
            return Err(CoreError::Validation(
                "exercise name cannot contain '|'".to_string(),
            ));
        }
        if initial_reps == 0 {
            return Err(CoreError::Validation(
                "rep count must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            sets: vec![initial_reps],
        })
    }

    /// Append a set.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the rep count is zero.
    pub fn add_set(&mut self, reps: u32) -> Result<(), CoreError> {
        if reps == 0 {
            return Err(CoreError::Validation(
                "rep count must be a positive integer".to_string(),
            ));
        }
        self.sets.push(reps);
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rep counts in set order.
    #[must_use]
    pub fn sets(&self) -> &[u32] {
        &self.sets
    }
}

/// A named exercise session. Open from creation until explicitly ended;
/// once ended it is immutable except for tag overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    name: String,
    username: String,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    duration_min: i64,
    exercises: Vec<Exercise>,
    auto_tags: BTreeSet<String>,
    manual_tags: BTreeSet<String>,
}

impl Workout {
    /// Create an open workout starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the name is empty.
    pub fn new(name: &str, start: NaiveDateTime, username: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "workout name cannot be empty".to_string(),
            ));
        }
        if name.contains('|') {
            return Err(CoreError::Validation(
                "workout name cannot contain '|'".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            username: username.to_string(),
            start,
            end: None,
            duration_min: 0,
            exercises: Vec::new(),
            auto_tags: BTreeSet::new(),
            manual_tags: BTreeSet::new(),
        })
    }

    /// Rebuild a closed workout from a persisted record. The end timestamp
    /// is derived from the stored duration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the name is empty or the duration
    /// is negative.
    pub fn from_record(
        name: &str,
        duration_min: i64,
        start: NaiveDateTime,
        username: &str,
        exercises: Vec<Exercise>,
    ) -> Result<Self, CoreError> {
        if duration_min < 0 {
            return Err(CoreError::Validation(format!(
                "duration must be non-negative, got {duration_min}"
            )));
        }
        let mut workout = Self::new(name, start, username)?;
        workout.end = Some(start + TimeDelta::minutes(duration_min));
        workout.duration_min = duration_min;
        workout.exercises = exercises;
        Ok(workout)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    /// Duration in whole minutes. Zero until the workout is ended.
    #[must_use]
    pub const fn duration_min(&self) -> i64 {
        self.duration_min
    }

    /// Whether the workout still accepts exercises and sets.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Close the workout and compute its duration in whole minutes.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EndBeforeStart` if `end` precedes the start; the
    /// workout is left open and unchanged so the caller can resubmit.
    pub fn finish(&mut self, end: NaiveDateTime) -> Result<i64, CoreError> {
        if end < self.start {
            return Err(CoreError::EndBeforeStart {
                start: self.start,
                end,
            });
        }
        let minutes = (end - self.start).num_minutes();
        self.end = Some(end);
        self.duration_min = minutes;
        Ok(minutes)
    }

    /// Append an exercise.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the workout is already ended.
    pub fn add_exercise(&mut self, exercise: Exercise) -> Result<(), CoreError> {
        if !self.is_open() {
            return Err(CoreError::Validation(format!(
                "workout '{}' is already ended",
                self.name
            )));
        }
        self.exercises.push(exercise);
        Ok(())
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub(crate) fn exercise_mut(&mut self, index: usize) -> Option<&mut Exercise> {
        self.exercises.get_mut(index)
    }

    #[must_use]
    pub const fn auto_tags(&self) -> &BTreeSet<String> {
        &self.auto_tags
    }

    /// Replace the auto-tag set. Manual overrides are untouched.
    pub fn set_auto_tags(&mut self, tags: BTreeSet<String>) {
        self.auto_tags = tags;
    }

    #[must_use]
    pub const fn manual_tags(&self) -> &BTreeSet<String> {
        &self.manual_tags
    }

    /// Replace the manual override set.
    pub fn set_manual_tags(&mut self, tags: BTreeSet<String>) {
        self.manual_tags = tags;
    }

    /// The tag set shown to the user: manual overrides take precedence over
    /// auto tags when any exist.
    #[must_use]
    pub fn display_tags(&self) -> &BTreeSet<String> {
        if self.manual_tags.is_empty() {
            &self.auto_tags
        } else {
            &self.manual_tags
        }
    }

    /// Human-readable start date, e.g. `Wednesday 22nd of October`.
    #[must_use]
    pub fn date_string(&self) -> String {
        let day = self.start.day();
        format!(
            "{} {}{} of {}",
            self.start.format("%A"),
            day,
            ordinal_suffix(day),
            self.start.format("%B")
        )
    }
}

const fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn creation_with_start_succeeds() {
        let start = at(2025, 10, 22, 9, 0);
        let workout = Workout::new("Morning Run", start, "testUser").unwrap();

        assert_eq!(workout.name(), "Morning Run");
        assert_eq!(workout.start(), start);
        assert_eq!(workout.username(), "testUser");
        assert_eq!(workout.duration_min(), 0);
        assert!(workout.is_open());
    }

    #[test]
    fn creation_rejects_empty_name() {
        let start = at(2025, 10, 22, 9, 0);
        assert!(Workout::new("  ", start, "testUser").is_err());
    }

    #[test]
    fn finish_computes_whole_minutes() {
        let mut workout = Workout::new("Test Workout", at(2025, 10, 22, 9, 0), "testUser").unwrap();
        let minutes = workout.finish(at(2025, 10, 22, 10, 0)).unwrap();

        assert_eq!(minutes, 60);
        assert_eq!(workout.duration_min(), 60);
        assert!(!workout.is_open());
    }

    #[test]
    fn finish_before_start_is_rejected_and_retryable() {
        let mut workout = Workout::new("Test Workout", at(2025, 10, 22, 9, 0), "testUser").unwrap();
        let error = workout.finish(at(2025, 10, 22, 8, 0)).unwrap_err();

        assert!(matches!(error, CoreError::EndBeforeStart { .. }));
        assert!(workout.is_open());
        assert_eq!(workout.duration_min(), 0);

        // Resubmitting a valid end succeeds.
        assert_eq!(workout.finish(at(2025, 10, 22, 9, 45)).unwrap(), 45);
    }

    #[test]
    fn closed_workout_rejects_new_exercises() {
        let mut workout = Workout::new("Test Workout", at(2025, 10, 22, 9, 0), "testUser").unwrap();
        workout.finish(at(2025, 10, 22, 10, 0)).unwrap();

        let exercise = Exercise::new("Push Up", 10).unwrap();
        assert!(workout.add_exercise(exercise).is_err());
    }

    #[test]
    fn exercise_tracks_sets_in_order() {
        let mut exercise = Exercise::new("Squat", 10).unwrap();
        exercise.add_set(8).unwrap();
        exercise.add_set(6).unwrap();

        assert_eq!(exercise.sets(), &[10, 8, 6]);
    }

    #[test]
    fn exercise_rejects_zero_reps() {
        assert!(Exercise::new("Squat", 0).is_err());
        let mut exercise = Exercise::new("Squat", 10).unwrap();
        assert!(exercise.add_set(0).is_err());
        assert_eq!(exercise.sets(), &[10]);
    }

    #[test]
    fn from_record_derives_end_from_duration() {
        let start = at(2025, 10, 22, 9, 0);
        let workout = Workout::from_record("Leg Day", 45, start, "testUser", Vec::new()).unwrap();

        assert!(!workout.is_open());
        assert_eq!(workout.end(), Some(at(2025, 10, 22, 9, 45)));
        assert_eq!(workout.duration_min(), 45);
    }

    #[test]
    fn from_record_rejects_negative_duration() {
        let start = at(2025, 10, 22, 9, 0);
        assert!(Workout::from_record("Leg Day", -5, start, "testUser", Vec::new()).is_err());
    }

    #[test]
    fn date_string_is_formatted_with_ordinal() {
        let workout = Workout::new("Test Workout", at(2025, 10, 22, 9, 0), "testUser").unwrap();
        assert_eq!(workout.date_string(), "Wednesday 22nd of October");
    }

    #[rstest]
    #[case(1, "st")]
    #[case(2, "nd")]
    #[case(3, "rd")]
    #[case(4, "th")]
    #[case(11, "th")]
    #[case(12, "th")]
    #[case(13, "th")]
    #[case(21, "st")]
    #[case(22, "nd")]
    #[case(23, "rd")]
    #[case(31, "st")]
    fn ordinal_suffixes(#[case] day: u32, #[case] suffix: &str) {
        assert_eq!(ordinal_suffix(day), suffix);
    }

    #[test]
    fn manual_tags_take_display_precedence() {
        let mut workout = Workout::new("Morning Run", at(2025, 10, 22, 9, 0), "u").unwrap();
        workout.set_auto_tags(["CARDIO".to_string()].into());
        assert_eq!(workout.display_tags().len(), 1);

        workout.set_manual_tags(["STRENGTH".to_string()].into());
        assert!(workout.display_tags().contains("STRENGTH"));
        assert!(!workout.display_tags().contains("CARDIO"));
        // The auto set survives underneath the override.
        assert!(workout.auto_tags().contains("CARDIO"));
    }
}
