//! Relative date ranges
//!
//! Converts relative-date operators into closed intervals of calendar days.
//! "Today" is always passed in; nothing here reads the clock.

use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::core::config::FirstDayOfWeek;

use super::types::FilterOperator;

/// Closed interval of calendar days; `None` is unbounded on that side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateInterval {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateInterval {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Tightest interval covered by both
    pub fn intersect(&self, other: &DateInterval) -> DateInterval {
        let from = match (self.from, other.from) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let to = match (self.to, other.to) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        DateInterval { from, to }
    }
}

/// Shift a date by whole days, saturating at the calendar limits
fn shift(today: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| today.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

/// Resolve day offsets relative to `today` into an interval
///
/// A lower bound of `Some(n)` includes `today + n` onwards; an upper bound of
/// `Some(n)` includes everything up to the end of `today + n`.
pub fn resolve(
    today: NaiveDate,
    from_offset_days: Option<i64>,
    to_offset_days: Option<i64>,
) -> DateInterval {
    DateInterval {
        from: from_offset_days.map(|n| shift(today, n)),
        to: to_offset_days.map(|n| shift(today, n)),
    }
}

/// Offset pair of a relative-date operator for user value `n`
///
/// Returns `None` for operators that are not relative-date operators.
pub fn relative_offsets(
    operator: FilterOperator,
    n: i64,
) -> Option<(Option<i64>, Option<i64>)> {
    let back = n.saturating_neg();
    match operator {
        FilterOperator::DateOnOrAfterRelative => Some((Some(back), None)),
        FilterOperator::DateOnOrBeforeRelative => Some((None, Some(back))),
        FilterOperator::DateExactlyRelative => Some((Some(back), Some(back))),
        FilterOperator::DateOnOrAfterFuture => Some((Some(n), None)),
        FilterOperator::DateOnOrBeforeFuture => Some((None, Some(n))),
        FilterOperator::DateExactlyFuture => Some((Some(n), Some(n))),
        FilterOperator::DateToday => Some((Some(0), Some(0))),
        _ => None,
    }
}

/// First day of the week containing `today`
pub fn week_start(today: NaiveDate, first_day: FirstDayOfWeek) -> NaiveDate {
    let today_idx = i64::from(today.weekday().num_days_from_monday());
    let first_idx = i64::from(first_day.weekday().num_days_from_monday());
    shift(today, -((today_idx - first_idx).rem_euclid(7)))
}

/// Current week: from its first day to the same weekday seven days later
pub fn week_interval(today: NaiveDate, first_day: FirstDayOfWeek) -> DateInterval {
    let from = week_start(today, first_day);
    DateInterval {
        from: Some(from),
        to: Some(shift(from, 7)),
    }
}
