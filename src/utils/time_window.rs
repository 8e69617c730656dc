//! Attendance classification from time-of-day values.
//!
//! Comparisons use the wall clock only: there is no date and no timezone,
//! so a window never wraps past midnight.

use chrono::NaiveTime;

use crate::model::attendance::{AttendanceStatus, LateStatus};
use crate::utils::time_format::TIME_FORMAT;

/// Parses a strict `HH:MM:SS` value.
pub fn parse_time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
}

/// Late iff `current` is strictly after `cutoff`.
pub fn determine_late_status(current: NaiveTime, cutoff: NaiveTime) -> LateStatus {
    if current > cutoff {
        LateStatus::Terlambat
    } else {
        LateStatus::TidakTerlambat
    }
}

/// `Masuk` up to (but excluding) `jam_pulang`, `Pulang` from then on.
pub fn determine_attendance_status(
    current: NaiveTime,
    jam_masuk: NaiveTime,
    jam_pulang: NaiveTime,
) -> AttendanceStatus {
    if current <= jam_masuk || (current > jam_masuk && current < jam_pulang) {
        AttendanceStatus::Masuk
    } else {
        AttendanceStatus::Pulang
    }
}
