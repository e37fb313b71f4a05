//! Cross-cutting error types for the Untis client.
//!
//! Protocol and session errors live in `untis-rpc`; this module only covers
//! failures that can be detected without a network round trip.

use thiserror::Error;

use crate::enums::SessionState;

/// Errors raised by the pure domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A packed `YYYYMMDD` integer that does not name a calendar date.
    #[error("invalid packed date: {0}")]
    InvalidPackedDate(i64),

    /// A packed `HMM`/`HHMM` integer that does not name a wall-clock time.
    #[error("invalid packed time: {0}")]
    InvalidPackedTime(i64),

    /// A session state machine transition that is not allowed.
    #[error("invalid session transition from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },
}
