//! # untis-core
//!
//! Core types shared across the Untis client crates.
//!
//! This crate holds everything that does not touch the network:
//! - Entity structs for lessons and reference records (teachers, rooms, classes)
//! - Enums for person types, reference kinds and the session state machine
//! - The packed date/time codec used by the timetable wire format
//! - The institutional period table (`period_from_start` / `period_from_end`)
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod packed;
pub mod period;

pub use entities::{Lesson, ReferenceEntity};
pub use enums::{PersonType, ReferenceKind, SessionState};
pub use errors::CoreError;
pub use period::{UNMAPPED_PERIOD, period_from_end, period_from_start};
