//! Codec for the packed date and time integers used by the timetable API.
//!
//! Dates travel as `YYYYMMDD` (e.g. `20240311`). Times travel as a variable
//! width integer whose last two decimal digits are minutes and whose leading
//! digits are hours, so `800` is 08:00 and `1715` is 17:15. The width of a
//! time depends on whether the hour has one or two digits.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::errors::CoreError;

/// Decode a packed `YYYYMMDD` integer into a calendar date.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPackedDate`] if the value is not eight digits
/// wide or does not name a real date.
pub fn decode_date(packed: i64) -> Result<NaiveDate, CoreError> {
    if !(10_000_000..=99_999_999).contains(&packed) {
        return Err(CoreError::InvalidPackedDate(packed));
    }
    let year = i32::try_from(packed / 10_000).map_err(|_| CoreError::InvalidPackedDate(packed))?;
    let month = u32::try_from(packed / 100 % 100).map_err(|_| CoreError::InvalidPackedDate(packed))?;
    let day = u32::try_from(packed % 100).map_err(|_| CoreError::InvalidPackedDate(packed))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(CoreError::InvalidPackedDate(packed))
}

/// Split a packed time into `(hour, minute)` without range checks beyond sign.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPackedTime`] for negative values.
pub fn split_time(packed: i64) -> Result<(u32, u32), CoreError> {
    let value = u32::try_from(packed).map_err(|_| CoreError::InvalidPackedTime(packed))?;
    Ok((value / 100, value % 100))
}

/// Decode a packed `HMM`/`HHMM` integer into a wall-clock time.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPackedTime`] if the value is negative, the
/// minute suffix is 60 or more, or the hour is 24 or more.
pub fn decode_time(packed: i64) -> Result<NaiveTime, CoreError> {
    let (hour, minute) = split_time(packed)?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(CoreError::InvalidPackedTime(packed))
}

/// Encode a wall-clock time as a packed integer (`hour * 100 + minute`).
#[must_use]
pub fn encode_time<T: Timelike>(time: &T) -> i64 {
    i64::from(time.hour() * 100 + time.minute())
}

/// Format a date as the `YYYYMMDD` string the timetable request expects.
#[must_use]
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}
