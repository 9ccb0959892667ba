//! Workout session state machine.
//!
//! The manager owns one month's workout collection together with the
//! open-workout and open-exercise cursors. The cursors are explicit fields
//! of this per-session value; nothing here is process-wide, so several
//! managers can coexist (one per user session, or per test).
//!
//! State model:
//!
//! ```text
//! Idle ──create──▶ WorkoutOpen ──add_exercise──▶ ExerciseOpen
//!                      ▲  │                          │
//!                      │  └──────── end ◀────────────┘
//!                      └─ create (retargets the cursor, no auto-close)
//! ```
//!
//! Persistence is the caller's concern: mutations that must survive a
//! restart are followed by a store save in the command layer, and a failed
//! save never rolls back the in-memory state.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::entities::{Exercise, Workout};
use crate::enums::{Modality, MuscleGroup};
use crate::errors::CoreError;
use crate::month::MonthKey;
use crate::tagger::Tagger;

/// Outcome of a successful `create_workout`, reporting which timestamp
/// parts were defaulted so the front end can announce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateReport {
    pub date_defaulted: bool,
    pub time_defaulted: bool,
}

/// What a delete command addresses. An index deletes directly; name and
/// date lookups may match several workouts, which the front end confirms
/// one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Name(String),
    Date(NaiveDate),
}

pub struct WorkoutManager {
    username: String,
    month: MonthKey,
    workouts: Vec<Workout>,
    current_workout: Option<usize>,
    current_exercise: Option<usize>,
}

impl WorkoutManager {
    #[must_use]
    pub fn new(username: &str, month: MonthKey) -> Self {
        Self {
            username: username.to_string(),
            month,
            workouts: Vec::new(),
            current_workout: None,
            current_exercise: None,
        }
    }

    #[must_use]
    pub fn with_workouts(username: &str, month: MonthKey, workouts: Vec<Workout>) -> Self {
        let mut manager = Self::new(username, month);
        manager.workouts = workouts;
        manager
    }

    /// Replace the collection, e.g. after loading a month. Clears both
    /// cursors.
    pub fn set_workouts(&mut self, workouts: Vec<Workout>) {
        self.workouts = workouts;
        self.current_workout = None;
        self.current_exercise = None;
    }

    #[must_use]
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn month(&self) -> MonthKey {
        self.month
    }

    /// The workout currently accepting exercises, if any.
    #[must_use]
    pub fn open_workout(&self) -> Option<&Workout> {
        self.current_workout.map(|index| &self.workouts[index])
    }

    /// Create a workout and make it current. Opening a new workout while
    /// one is already open simply retargets the cursors; the previous
    /// workout stays in the collection, still open.
    ///
    /// Missing date and time default to `now` independently; the report
    /// says which were defaulted so the caller can notify the user.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` for an empty name, or for an explicit start
    /// date outside the loaded month (workouts are filed by start month at
    /// creation and this collection only holds one month).
    pub fn create_workout(
        &mut self,
        name: &str,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        now: NaiveDateTime,
        tagger: &Tagger,
    ) -> Result<CreateReport, CoreError> {
        let date_defaulted = date.is_none();
        let time_defaulted = time.is_none();
        let date = date.unwrap_or_else(|| now.date());
        let time = time.unwrap_or_else(|| now.time());

        if !self.month.contains(date) {
            return Err(CoreError::Validation(format!(
                "start date {} is outside the loaded month {}",
                date.format("%d/%m/%y"),
                self.month
            )));
        }

        let mut workout = Workout::new(name, NaiveDateTime::new(date, time), &self.username)?;
        let tags = tagger.suggest(&workout);
        workout.set_auto_tags(tags);

        self.workouts.push(workout);
        self.current_workout = Some(self.workouts.len() - 1);
        self.current_exercise = None;

        Ok(CreateReport {
            date_defaulted,
            time_defaulted,
        })
    }

    /// Add an exercise to the open workout and make it the set target.
    ///
    /// # Errors
    ///
    /// `CoreError::NoOpenWorkout` when nothing is open;
    /// `CoreError::Validation` for an empty name or zero reps.
    pub fn add_exercise(
        &mut self,
        name: &str,
        initial_reps: u32,
        tagger: &Tagger,
    ) -> Result<(), CoreError> {
        let index = self.current_workout.ok_or(CoreError::NoOpenWorkout)?;
        let exercise = Exercise::new(name, initial_reps)?;

        let workout = &mut self.workouts[index];
        workout.add_exercise(exercise)?;
        self.current_exercise = Some(workout.exercises().len() - 1);

        // The searchable text grew, so the auto tags may have too.
        let tags = tagger.suggest(workout);
        workout.set_auto_tags(tags);
        Ok(())
    }

    /// Append a set to the most recently added exercise.
    ///
    /// # Errors
    ///
    /// `CoreError::NoOpenWorkout` / `CoreError::NoOpenExercise` when there
    /// is no target; `CoreError::Validation` for zero reps.
    pub fn add_set(&mut self, reps: u32) -> Result<(), CoreError> {
        let workout_index = self.current_workout.ok_or(CoreError::NoOpenWorkout)?;
        let exercise_index = self.current_exercise.ok_or(CoreError::NoOpenExercise)?;

        self.workouts[workout_index]
            .exercise_mut(exercise_index)
            .ok_or(CoreError::NoOpenExercise)?
            .add_set(reps)
    }

    /// Close the open workout, returning its duration in whole minutes.
    ///
    /// # Errors
    ///
    /// `CoreError::NoOpenWorkout` when nothing is open.
    /// `CoreError::EndBeforeStart` when `end` precedes the start; the
    /// workout stays open and the caller may resubmit a valid end.
    pub fn end_workout(&mut self, end: NaiveDateTime) -> Result<i64, CoreError> {
        let index = self.current_workout.ok_or(CoreError::NoOpenWorkout)?;
        let minutes = self.workouts[index].finish(end)?;
        self.current_workout = None;
        self.current_exercise = None;
        Ok(minutes)
    }

    /// Indices of the workouts a delete target addresses, in collection
    /// order. The front end deletes a single match directly and walks a
    /// multi-match set with per-workout confirmation.
    #[must_use]
    pub fn find_matches(&self, target: &DeleteTarget) -> Vec<usize> {
        self.workouts
            .iter()
            .enumerate()
            .filter(|(_, workout)| match target {
                DeleteTarget::Name(name) => workout.name() == name,
                DeleteTarget::Date(date) => workout.start().date() == *date,
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Remove the workout at a 0-based collection index, fixing up the
    /// cursors.
    ///
    /// # Errors
    ///
    /// `CoreError::IndexOutOfRange` (reported 1-based) when out of bounds.
    pub fn delete_at(&mut self, index: usize) -> Result<Workout, CoreError> {
        if index >= self.workouts.len() {
            return Err(CoreError::IndexOutOfRange {
                index: index + 1,
                size: self.workouts.len(),
            });
        }

        match self.current_workout {
            Some(current) if current == index => {
                self.current_workout = None;
                self.current_exercise = None;
            }
            Some(current) if current > index => {
                self.current_workout = Some(current - 1);
            }
            _ => {}
        }

        Ok(self.workouts.remove(index))
    }

    /// Replace one workout's manual tag set. Returns the auto tags the
    /// override contradicts, as a diagnostic for the caller (not an error).
    ///
    /// # Errors
    ///
    /// `CoreError::IndexOutOfRange` for a bad index;
    /// `CoreError::Validation` for empty tag text.
    pub fn override_tags(&mut self, index: usize, tag_text: &str) -> Result<Vec<String>, CoreError> {
        let size = self.workouts.len();
        let workout = self
            .workouts
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange {
                index: index + 1,
                size,
            })?;

        let new_tags: std::collections::BTreeSet<String> = tag_text
            .split([',', ' '])
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_uppercase)
            .collect();
        if new_tags.is_empty() {
            return Err(CoreError::Validation("tag text cannot be empty".to_string()));
        }

        let overridden = workout
            .auto_tags()
            .iter()
            .filter(|tag| !new_tags.contains(*tag))
            .cloned()
            .collect();
        workout.set_manual_tags(new_tags);
        Ok(overridden)
    }

    /// Add a modality keyword through the tagger and, on success, recompute
    /// every workout's auto tags. A conflict leaves both the dictionaries
    /// and the workouts untouched.
    ///
    /// # Errors
    ///
    /// See [`Tagger::add_modality_keyword`].
    pub fn add_modality_keyword(
        &mut self,
        tagger: &mut Tagger,
        modality: Modality,
        keyword: &str,
    ) -> Result<(), CoreError> {
        tagger.add_modality_keyword(modality, keyword, &self.workouts)?;
        self.retag_all(tagger);
        Ok(())
    }

    /// Add a muscle-group keyword and recompute every workout's auto tags.
    ///
    /// # Errors
    ///
    /// See [`Tagger::add_muscle_keyword`].
    pub fn add_muscle_keyword(
        &mut self,
        tagger: &mut Tagger,
        group: MuscleGroup,
        keyword: &str,
    ) -> Result<(), CoreError> {
        tagger.add_muscle_keyword(group, keyword)?;
        self.retag_all(tagger);
        Ok(())
    }

    /// Recompute and replace every workout's auto-tag set. Manual overrides
    /// are left untouched.
    pub fn retag_all(&mut self, tagger: &Tagger) {
        for workout in &mut self.workouts {
            let tags = tagger.suggest(workout);
            workout.set_auto_tags(tags);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn october() -> MonthKey {
        MonthKey::new(2025, 10).unwrap()
    }

    fn at(d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn manager_with_open_workout() -> (WorkoutManager, Tagger) {
        let tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());
        manager
            .create_workout("Leg Day", None, None, at(22, 9, 0), &tagger)
            .unwrap();
        (manager, tagger)
    }

    #[test]
    fn create_reports_defaulted_fields_independently() {
        let tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());

        let report = manager
            .create_workout(
                "Run",
                Some(NaiveDate::from_ymd_opt(2025, 10, 22).unwrap()),
                None,
                at(5, 8, 30),
                &tagger,
            )
            .unwrap();

        assert!(!report.date_defaulted);
        assert!(report.time_defaulted);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.workouts()[0].start(), at(22, 8, 30));
    }

    #[test]
    fn create_rejects_empty_name_without_state_change() {
        let tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());

        assert!(manager
            .create_workout("   ", None, None, at(22, 9, 0), &tagger)
            .is_err());
        assert!(manager.is_empty());
        assert!(manager.open_workout().is_none());
    }

    #[test]
    fn create_rejects_date_outside_loaded_month() {
        let tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());

        let error = manager
            .create_workout(
                "Run",
                Some(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()),
                None,
                at(22, 9, 0),
                &tagger,
            )
            .unwrap_err();

        assert!(matches!(error, CoreError::Validation(_)));
        assert!(manager.is_empty());
    }

    #[test]
    fn create_while_open_retargets_without_closing() {
        let (mut manager, tagger) = manager_with_open_workout();
        manager
            .create_workout("Evening Run", None, None, at(22, 18, 0), &tagger)
            .unwrap();

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.open_workout().unwrap().name(), "Evening Run");
        // The first workout was not auto-closed.
        assert!(manager.workouts()[0].is_open());
    }

    #[test]
    fn add_exercise_requires_open_workout() {
        let tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());

        let error = manager.add_exercise("PushUp", 10, &tagger).unwrap_err();
        assert!(matches!(error, CoreError::NoOpenWorkout));
        assert!(manager.is_empty());
    }

    #[test]
    fn exercise_then_set_yields_exact_sequence() {
        let (mut manager, tagger) = manager_with_open_workout();

        manager.add_exercise("Squat", 10, &tagger).unwrap();
        manager.add_set(8).unwrap();

        let sets = manager.workouts()[0].exercises()[0].sets();
        assert_eq!(sets, &[10, 8]);
    }

    #[test]
    fn add_set_targets_most_recent_exercise() {
        let (mut manager, tagger) = manager_with_open_workout();

        manager.add_exercise("Squat", 10, &tagger).unwrap();
        manager.add_exercise("Lunge", 12, &tagger).unwrap();
        manager.add_set(11).unwrap();

        let workout = &manager.workouts()[0];
        assert_eq!(workout.exercises()[0].sets(), &[10]);
        assert_eq!(workout.exercises()[1].sets(), &[12, 11]);
    }

    #[test]
    fn add_set_without_exercise_is_reported() {
        let (mut manager, _tagger) = manager_with_open_workout();
        assert!(matches!(
            manager.add_set(8).unwrap_err(),
            CoreError::NoOpenExercise
        ));
    }

    #[test]
    fn add_set_rejects_zero_reps() {
        let (mut manager, tagger) = manager_with_open_workout();
        manager.add_exercise("Squat", 10, &tagger).unwrap();

        assert!(manager.add_set(0).is_err());
        assert_eq!(manager.workouts()[0].exercises()[0].sets(), &[10]);
    }

    #[test]
    fn end_before_start_is_retryable() {
        let (mut manager, _tagger) = manager_with_open_workout();

        let error = manager.end_workout(at(22, 8, 0)).unwrap_err();
        assert!(matches!(error, CoreError::EndBeforeStart { .. }));
        assert!(manager.open_workout().is_some());

        // A valid resubmission computes whole minutes.
        assert_eq!(manager.end_workout(at(22, 10, 0)).unwrap(), 60);
        assert!(manager.open_workout().is_none());
        assert!(!manager.workouts()[0].is_open());
    }

    #[test]
    fn end_without_open_workout_is_reported() {
        let mut manager = WorkoutManager::new("Loan", october());

        assert!(matches!(
            manager.end_workout(at(22, 10, 0)).unwrap_err(),
            CoreError::NoOpenWorkout
        ));
    }

    #[test]
    fn find_matches_by_name_and_date() {
        let tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());
        manager
            .create_workout("Run", Some(at(5, 0, 0).date()), Some(at(5, 8, 0).time()), at(1, 0, 0), &tagger)
            .unwrap();
        manager
            .create_workout("Run", Some(at(12, 0, 0).date()), Some(at(12, 8, 0).time()), at(1, 0, 0), &tagger)
            .unwrap();
        manager
            .create_workout("Yoga", Some(at(12, 0, 0).date()), Some(at(12, 18, 0).time()), at(1, 0, 0), &tagger)
            .unwrap();

        let by_name = manager.find_matches(&DeleteTarget::Name("Run".to_string()));
        assert_eq!(by_name, vec![0, 1]);

        let by_date = manager.find_matches(&DeleteTarget::Date(at(12, 0, 0).date()));
        assert_eq!(by_date, vec![1, 2]);

        let none = manager.find_matches(&DeleteTarget::Name("Swim".to_string()));
        assert!(none.is_empty());
    }

    #[test]
    fn delete_fixes_up_the_open_cursor() {
        let tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());
        manager
            .create_workout("First", None, None, at(5, 8, 0), &tagger)
            .unwrap();
        manager
            .create_workout("Second", None, None, at(6, 8, 0), &tagger)
            .unwrap();

        // Deleting below the cursor shifts it down.
        let removed = manager.delete_at(0).unwrap();
        assert_eq!(removed.name(), "First");
        assert_eq!(manager.open_workout().unwrap().name(), "Second");
        manager.add_exercise("Squat", 5, &tagger).unwrap();

        // Deleting the open workout clears the cursors.
        manager.delete_at(0).unwrap();
        assert!(manager.open_workout().is_none());
        assert!(matches!(
            manager.add_set(5).unwrap_err(),
            CoreError::NoOpenWorkout
        ));
    }

    #[test]
    fn delete_out_of_bounds_is_reported() {
        let (mut manager, _tagger) = manager_with_open_workout();
        assert!(matches!(
            manager.delete_at(3).unwrap_err(),
            CoreError::IndexOutOfRange { index: 4, size: 1 }
        ));
    }

    #[test]
    fn override_tags_replaces_and_reports_contradictions() {
        let tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());
        manager
            .create_workout("Morning Run", None, None, at(22, 9, 0), &tagger)
            .unwrap();
        assert!(manager.workouts()[0].auto_tags().contains("CARDIO"));

        let overridden = manager.override_tags(0, "recovery").unwrap();
        assert_eq!(overridden, vec!["CARDIO".to_string()]);
        assert!(manager.workouts()[0].manual_tags().contains("RECOVERY"));

        // A second override replaces, never merges.
        manager.override_tags(0, "easy, outdoors").unwrap();
        let manual = manager.workouts()[0].manual_tags();
        assert_eq!(manual.len(), 2);
        assert!(!manual.contains("RECOVERY"));
    }

    #[test]
    fn override_tags_rejects_empty_text() {
        let (mut manager, _tagger) = manager_with_open_workout();
        assert!(manager.override_tags(0, "  ,  ").is_err());
        assert!(manager.workouts()[0].manual_tags().is_empty());
    }

    #[test]
    fn rejected_keyword_leaves_tags_untouched() {
        let mut tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());
        manager
            .create_workout("Morning Run", None, None, at(22, 9, 0), &tagger)
            .unwrap();
        let before = manager.workouts()[0].auto_tags().clone();

        let result = manager.add_modality_keyword(&mut tagger, Modality::Strength, "morning");
        assert!(result.is_err());
        assert_eq!(manager.workouts()[0].auto_tags(), &before);
    }

    #[test]
    fn muscle_keyword_retags_existing_workouts() {
        let mut tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());
        manager
            .create_workout("Morning Run", None, None, at(22, 9, 0), &tagger)
            .unwrap();
        assert!(!manager.workouts()[0].auto_tags().contains("LEGS"));

        manager
            .add_muscle_keyword(&mut tagger, MuscleGroup::Legs, "run")
            .unwrap();
        assert!(manager.workouts()[0].auto_tags().contains("LEGS"));
    }

    #[test]
    fn retag_preserves_manual_overrides() {
        let mut tagger = Tagger::with_defaults();
        let mut manager = WorkoutManager::new("Loan", october());
        manager
            .create_workout("Morning Run", None, None, at(22, 9, 0), &tagger)
            .unwrap();
        manager.override_tags(0, "recovery").unwrap();

        manager
            .add_muscle_keyword(&mut tagger, MuscleGroup::Legs, "run")
            .unwrap();

        let workout = &manager.workouts()[0];
        assert!(workout.auto_tags().contains("LEGS"));
        assert!(workout.manual_tags().contains("RECOVERY"));
    }
}
