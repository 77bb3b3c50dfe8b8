//! Calendar-day arithmetic shared by the schedule index, the study-leave
//! picker and the countdown.
//!
//! Exam dates are stored as `YYYY-MM-DD`, but records written by other tools
//! sometimes carry a time or an offset (`2025-04-15T00:00:00+05:30`). Every
//! function here accepts either a bare `NaiveDate` or a `NaiveDateTime`; a bare
//! date is treated as midnight so the arithmetic is exact for date-only input.

use crate::error::InvalidDateError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const LABEL_FORMAT: &str = "%B %d, %Y";

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A point on the calendar, with or without a time of day.
pub trait CalendarInstant: Copy {
    fn instant(self) -> NaiveDateTime;

    fn calendar_day(self) -> NaiveDate {
        self.instant().date()
    }
}

impl CalendarInstant for NaiveDate {
    fn instant(self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }
}

impl CalendarInstant for NaiveDateTime {
    fn instant(self) -> NaiveDateTime {
        self
    }
}

/// Split of a signed span into whole days plus the hour and minute remainders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitDuration {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

/// Parses a stored exam date. Offsets are dropped after reading the wall-clock
/// value, so `2025-04-15T00:30:00+05:30` stays on April 15.
pub fn parse_instant(raw: &str) -> Result<NaiveDateTime, InvalidDateError> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date.instant());
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .map_err(|_| InvalidDateError::new(raw))
}

pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, InvalidDateError> {
    parse_instant(raw).map(|dt| dt.date())
}

pub fn same_calendar_day<A: CalendarInstant, B: CalendarInstant>(a: A, b: B) -> bool {
    a.calendar_day() == b.calendar_day()
}

/// Signed whole days from `from` to `to`, truncated toward zero.
pub fn day_difference<A: CalendarInstant, B: CalendarInstant>(from: A, to: B) -> i64 {
    (to.instant() - from.instant()).num_days()
}

/// Days, hours (0-23) and minutes (0-59) between two instants, all derived
/// from the same span.
pub fn split_duration<A: CalendarInstant, B: CalendarInstant>(from: A, to: B) -> SplitDuration {
    let span = to.instant() - from.instant();
    SplitDuration {
        days: day_difference(from, to),
        hours: span.num_hours() % 24,
        minutes: span.num_minutes() % 60,
    }
}

/// "April 15, 2025"
pub fn format_label(date: NaiveDate) -> String {
    date.format(LABEL_FORMAT).to_string()
}

pub fn format_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
