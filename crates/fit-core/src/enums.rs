//! Tag category enums for fitlog.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `as_str` is the canonical lowercase token accepted from user input;
//! `tag_name` is the uppercase form used as the tag string on workouts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Modality
// ---------------------------------------------------------------------------

/// Training modality of a workout. Modalities are mutually exclusive per
/// matching keyword: the tagging engine refuses keyword additions that would
/// resolve one workout to two modalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Cardio,
    Strength,
}

impl Modality {
    /// All modalities, in tag order.
    pub const ALL: &'static [Self] = &[Self::Cardio, Self::Strength];

    /// The lowercase token accepted from user input.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cardio => "cardio",
            Self::Strength => "strength",
        }
    }

    /// The uppercase tag string attached to workouts.
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::Cardio => "CARDIO",
            Self::Strength => "STRENGTH",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == token)
            .ok_or_else(|| format!("unknown modality '{s}' (expected cardio or strength)"))
    }
}

// ---------------------------------------------------------------------------
// MuscleGroup
// ---------------------------------------------------------------------------

/// Muscle group targeted by a workout. Unlike modalities, muscle groups are
/// many-to-many with workouts and carry no exclusivity constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Legs,
    Chest,
    Back,
    Shoulders,
    Arms,
    Core,
    PosteriorChain,
}

impl MuscleGroup {
    /// All muscle groups, in tag order.
    pub const ALL: &'static [Self] = &[
        Self::Legs,
        Self::Chest,
        Self::Back,
        Self::Shoulders,
        Self::Arms,
        Self::Core,
        Self::PosteriorChain,
    ];

    /// The lowercase token accepted from user input.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legs => "legs",
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Arms => "arms",
            Self::Core => "core",
            Self::PosteriorChain => "posterior_chain",
        }
    }

    /// The uppercase tag string attached to workouts.
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::Legs => "LEGS",
            Self::Chest => "CHEST",
            Self::Back => "BACK",
            Self::Shoulders => "SHOULDERS",
            Self::Arms => "ARMS",
            Self::Core => "CORE",
            Self::PosteriorChain => "POSTERIOR_CHAIN",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

impl FromStr for MuscleGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == token)
            .ok_or_else(|| format!("unknown muscle group '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
