//! # fit-core
//!
//! Core types and session logic for fitlog.
//!
//! This crate provides the foundational pieces shared across the fitlog
//! crates:
//! - Entity structs for the domain objects (workouts, exercises, weight
//!   records, user profile)
//! - Tag category enums with keyword dictionaries
//! - The month partition key used by the persistence layer
//! - The keyword-driven auto-tagging engine
//! - The workout session state machine
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod manager;
pub mod month;
pub mod tagger;
