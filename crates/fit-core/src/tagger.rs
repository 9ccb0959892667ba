//! Keyword-driven auto-tagging engine.
//!
//! Two dictionary families map tag categories to lowercase keywords:
//! modalities (mutually exclusive per matching workout) and muscle groups
//! (many-to-many). `suggest` derives a workout's auto-tag set from substring
//! matches against its name and exercise names. The dictionaries live for
//! the process only; tags are recomputed from them whenever they change.

use std::collections::{BTreeMap, BTreeSet};

use crate::entities::Workout;
use crate::enums::{Modality, MuscleGroup};
use crate::errors::{CoreError, KeywordConflict};

pub struct Tagger {
    modality_keywords: BTreeMap<Modality, BTreeSet<String>>,
    muscle_keywords: BTreeMap<MuscleGroup, BTreeSet<String>>,
}

impl Tagger {
    /// An engine with empty dictionaries.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            modality_keywords: BTreeMap::new(),
            muscle_keywords: BTreeMap::new(),
        }
    }

    /// An engine seeded with the startup dictionaries.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut tagger = Self::new();

        let seed_modality = [
            (Modality::Cardio, &["run", "jog", "sprint", "cycle", "swim", "rowing", "hiit", "cardio"][..]),
            (Modality::Strength, &["lift", "press", "squat", "deadlift", "curl", "bench", "strength"][..]),
        ];
        for (modality, keywords) in seed_modality {
            let entry = tagger.modality_keywords.entry(modality).or_default();
            entry.extend(keywords.iter().map(ToString::to_string));
        }

        let seed_muscle = [
            (MuscleGroup::Legs, &["squat", "lunge", "leg press", "calf raise"][..]),
            (MuscleGroup::Chest, &["bench", "push up", "pushup", "chest fly"][..]),
            (MuscleGroup::Back, &["pull up", "pullup", "row", "lat"][..]),
            (MuscleGroup::Shoulders, &["shoulder press", "overhead press", "lateral raise", "shrug"][..]),
            (MuscleGroup::Arms, &["curl", "tricep", "bicep", "dip"][..]),
            (MuscleGroup::Core, &["plank", "crunch", "sit up", "situp", "abs"][..]),
            (MuscleGroup::PosteriorChain, &["deadlift", "hip thrust", "glute bridge", "hamstring"][..]),
        ];
        for (group, keywords) in seed_muscle {
            let entry = tagger.muscle_keywords.entry(group).or_default();
            entry.extend(keywords.iter().map(ToString::to_string));
        }

        tagger
    }

    /// Compute the auto-tag set for a workout. Manual overrides are never
    /// part of the result.
    #[must_use]
    pub fn suggest(&self, workout: &Workout) -> BTreeSet<String> {
        let text = searchable_text(workout);
        let mut tags = BTreeSet::new();

        for (modality, keywords) in &self.modality_keywords {
            if keywords.iter().any(|keyword| matches_text(&text, keyword)) {
                tags.insert(modality.tag_name().to_string());
            }
        }
        for (group, keywords) in &self.muscle_keywords {
            if keywords.iter().any(|keyword| matches_text(&text, keyword)) {
                tags.insert(group.tag_name().to_string());
            }
        }

        tags
    }

    /// The modalities a workout's text currently resolves to.
    #[must_use]
    pub fn matching_modalities(&self, workout: &Workout) -> BTreeSet<Modality> {
        let text = searchable_text(workout);
        self.modality_keywords
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|keyword| matches_text(&text, keyword)))
            .map(|(modality, _)| *modality)
            .collect()
    }

    /// Add a modality keyword, refusing additions that would resolve any
    /// existing workout to two different modalities.
    ///
    /// The scan runs before anything is committed: on conflict the
    /// dictionaries are unchanged and the error lists every conflicting
    /// workout with the modality it already resolves to. The caller is
    /// responsible for re-tagging after a successful insert.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` for an empty keyword;
    /// `CoreError::ModalityConflict` when the addition is refused.
    pub fn add_modality_keyword(
        &mut self,
        modality: Modality,
        keyword: &str,
        workouts: &[Workout],
    ) -> Result<(), CoreError> {
        let keyword = normalize_keyword(keyword)?;

        let mut conflicts = Vec::new();
        for workout in workouts {
            let text = searchable_text(workout);
            if !matches_text(&text, &keyword) {
                continue;
            }
            for (&existing, keywords) in &self.modality_keywords {
                if existing == modality {
                    continue;
                }
                if keywords.iter().any(|k| matches_text(&text, k)) {
                    conflicts.push(KeywordConflict {
                        workout: workout.name().to_string(),
                        existing,
                    });
                }
            }
        }

        if !conflicts.is_empty() {
            return Err(CoreError::ModalityConflict {
                keyword,
                modality,
                conflicts,
            });
        }

        self.modality_keywords
            .entry(modality)
            .or_default()
            .insert(keyword);
        Ok(())
    }

    /// Add a muscle-group keyword. Muscle groups are many-to-many with
    /// workouts, so there is no exclusivity scan; the caller re-tags after
    /// the insert.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` for an empty keyword.
    pub fn add_muscle_keyword(
        &mut self,
        group: MuscleGroup,
        keyword: &str,
    ) -> Result<(), CoreError> {
        let keyword = normalize_keyword(keyword)?;
        self.muscle_keywords.entry(group).or_default().insert(keyword);
        Ok(())
    }

    /// The keywords currently registered for a modality.
    #[must_use]
    pub fn modality_keywords(&self, modality: Modality) -> Option<&BTreeSet<String>> {
        self.modality_keywords.get(&modality)
    }

    /// The keywords currently registered for a muscle group.
    #[must_use]
    pub fn muscle_keywords(&self, group: MuscleGroup) -> Option<&BTreeSet<String>> {
        self.muscle_keywords.get(&group)
    }
}

impl Default for Tagger {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased workout name plus every exercise name.
fn searchable_text(workout: &Workout) -> Vec<String> {
    let mut text = Vec::with_capacity(1 + workout.exercises().len());
    text.push(workout.name().to_lowercase());
    text.extend(workout.exercises().iter().map(|e| e.name().to_lowercase()));
    text
}

fn matches_text(text: &[String], keyword: &str) -> bool {
    text.iter().any(|fragment| fragment.contains(keyword))
}

fn normalize_keyword(keyword: &str) -> Result<String, CoreError> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Err(CoreError::Validation(
            "keyword cannot be empty".to_string(),
        ));
    }
    Ok(keyword)
}
