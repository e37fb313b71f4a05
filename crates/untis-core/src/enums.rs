//! Enums shared across the Untis client.
//!
//! All enums serialize as `snake_case` strings. [`PersonType`] additionally
//! carries the numeric element code used on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Lifecycle of an authenticated session.
///
/// ```text
/// unauthenticated → authenticated → closed
/// ```
///
/// The machine is linear. A closed session is never re-opened; a new session
/// record has to be created instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated,
    Closed,
}

impl SessionState {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Unauthenticated => &[Self::Authenticated],
            Self::Authenticated => &[Self::Closed],
            Self::Closed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Validate a transition, returning the next state on success.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if `next` is not reachable
    /// from `self`.
    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PersonType
// ---------------------------------------------------------------------------

/// Element type of the logged-in person, or of a timetable subject.
///
/// Numeric codes follow the service's element types. Anything the service
/// sends that is not listed here maps to [`PersonType::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonType {
    #[default]
    Unknown,
    Class,
    Teacher,
    Subject,
    Room,
    Student,
}

impl PersonType {
    /// Wire code for this element type. `Unknown` is `-1`.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Unknown => -1,
            Self::Class => 1,
            Self::Teacher => 2,
            Self::Subject => 3,
            Self::Room => 4,
            Self::Student => 5,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Class,
            2 => Self::Teacher,
            3 => Self::Subject,
            4 => Self::Room,
            5 => Self::Student,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Class => "class",
            Self::Teacher => "teacher",
            Self::Subject => "subject",
            Self::Room => "room",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReferenceKind
// ---------------------------------------------------------------------------

/// The reference listings that translate numeric foreign keys into names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Teacher,
    Room,
    Class,
    Subject,
}

impl ReferenceKind {
    /// JSON-RPC method that returns the full listing for this kind.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::Teacher => "getTeachers",
            Self::Room => "getRooms",
            Self::Class => "getKlassen",
            Self::Subject => "getSubjects",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Room => "room",
            Self::Class => "class",
            Self::Subject => "subject",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
