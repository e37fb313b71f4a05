//! Institutional period table.
//!
//! Maps a lesson's wall-clock start or end time to the ordinal period the
//! school uses on its forms. Hours 8 and 17 (start) and 16 (end) hold two
//! periods each, told apart by the minute. Anything outside the table yields
//! [`UNMAPPED_PERIOD`].

use chrono::Timelike;

/// Returned for times that fall outside the period table.
pub const UNMAPPED_PERIOD: i32 = -1;

/// Period number for a lesson starting at `time`.
#[must_use]
pub fn period_from_start<T: Timelike>(time: &T) -> i32 {
    match (time.hour(), time.minute()) {
        (8, 0) => 1,
        (8, 50) => 2,
        (9, _) => 3,
        (10, _) => 4,
        (11, _) => 5,
        (12, _) => 6,
        (13, _) => 7,
        (14, _) => 8,
        (15, _) => 9,
        (16, _) => 10,
        (17, 0) => 11,
        (17, 45) => 12,
        (18, _) => 13,
        (19, _) => 14,
        (20, _) => 15,
        _ => UNMAPPED_PERIOD,
    }
}

/// Period number for a lesson ending at `time`.
#[must_use]
pub fn period_from_end<T: Timelike>(time: &T) -> i32 {
    match (time.hour(), time.minute()) {
        (8, _) => 1,
        (9, _) => 2,
        (10, _) => 3,
        (11, _) => 4,
        (12, _) => 5,
        (13, _) => 6,
        (14, _) => 7,
        (15, _) => 8,
        (16, 0) => 9,
        (16, 50) => 10,
        (17, _) => 11,
        (18, _) => 12,
        (19, _) => 13,
        (20, _) => 14,
        (21, _) => 15,
        _ => UNMAPPED_PERIOD,
    }
}
