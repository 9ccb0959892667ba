//! # fit-store
//!
//! Durable storage for fitlog: per-(user, month) workout collections, the
//! per-user weight history, and the profile file holding the last-used
//! display name.
//!
//! Saves are full-replace writes of the whole collection. Loads are
//! tolerant: any malformed record line is skipped with a diagnostic and
//! decoding continues; only "file does not exist" surfaces as the typed
//! [`StoreError::NotFound`], which callers are expected to handle (e.g. by
//! offering to initialize a new period).

pub mod codec;
mod error;
mod store;

pub use codec::{DecodeReport, SkippedLine};
pub use error::StoreError;
pub use store::WorkoutStore;
