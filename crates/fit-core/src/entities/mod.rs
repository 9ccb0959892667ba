//! Entity structs for the fitlog domain objects.
//!
//! Workouts and their exercises are persisted per month by `fit-store`;
//! weight records and the profile are persisted per user. All structs keep
//! their fields private and enforce their invariants in constructors and
//! mutators.

mod profile;
mod weight;
mod workout;

pub use profile::UserProfile;
pub use weight::WeightRecord;
pub use workout::{Exercise, Workout};
