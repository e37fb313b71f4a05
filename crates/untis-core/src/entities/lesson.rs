use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::period::{period_from_end, period_from_start};

/// A single lesson reconstructed from a raw timetable record.
///
/// Id and name lists run in parallel but may differ in length: ids that did
/// not resolve against the reference listings have no name entry. Ids keep
/// the order the service sent them in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lesson {
    /// Service-side lesson id (0 if the record carried none).
    pub lesson_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub class_ids: Vec<i64>,
    pub classes: Vec<String>,
    pub teacher_ids: Vec<i64>,
    pub teachers: Vec<String>,
    pub room_ids: Vec<i64>,
    pub rooms: Vec<String>,
    /// Subject ids as sent by the service. Not resolved to names.
    pub subject_ids: Vec<i64>,
}

impl Lesson {
    /// Calendar day the lesson takes place on.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Ordinal period this lesson starts in, or `-1` if unmapped.
    #[must_use]
    pub fn start_period(&self) -> i32 {
        period_from_start(&self.start)
    }

    /// Ordinal period this lesson ends in, or `-1` if unmapped.
    #[must_use]
    pub fn end_period(&self) -> i32 {
        period_from_end(&self.end)
    }
}
