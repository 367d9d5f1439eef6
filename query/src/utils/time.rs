//! Clock abstraction
//!
//! Date filters never read the system time directly; the current date is
//! supplied through a `Clock` so queries are reproducible in tests.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Source of "today"
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the current UTC date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always returns the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Last representable instant of a day (microsecond precision)
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let time = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

/// Clamp a date into years 0000..=9999
///
/// Dates outside that range format with a sign or extra digits and no longer
/// compare correctly as `YYYY-MM-DD` text.
pub fn clamp_to_four_digit_year(date: NaiveDate) -> NaiveDate {
    let (Some(min), Some(max)) = (
        NaiveDate::from_ymd_opt(0, 1, 1),
        NaiveDate::from_ymd_opt(9999, 12, 31),
    ) else {
        return date;
    };
    date.clamp(min, max)
}

/// Midnight at the start of a day
pub fn beginning_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
