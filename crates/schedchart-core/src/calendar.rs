//! Calendar arithmetic over whole days
//!
//! Every function works at day precision: time-of-day never influences a
//! result. Week boundaries depend on the weekday a week starts on.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Midnight of the same calendar day
pub fn start_of_day(datetime: NaiveDateTime) -> NaiveDateTime {
    datetime.date().and_time(NaiveTime::MIN)
}

/// Number of calendar days from `right` to `left` (negative if `left` is earlier)
pub fn difference_in_calendar_days(left: NaiveDate, right: NaiveDate) -> i64 {
    left.signed_duration_since(right).num_days()
}

/// First day of the week containing `date`
pub fn start_of_week(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday()
        - week_starts_on.num_days_from_monday())
        % 7;
    date - chrono::Duration::days(i64::from(offset))
}

/// Last day of the week containing `date`
pub fn end_of_week(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    start_of_week(date, week_starts_on) + chrono::Duration::days(6)
}

/// Number of week boundaries crossed from `right` to `left`
pub fn difference_in_calendar_weeks(left: NaiveDate, right: NaiveDate, week_starts_on: Weekday) -> i64 {
    let days = difference_in_calendar_days(
        start_of_week(left, week_starts_on),
        start_of_week(right, week_starts_on),
    );
    days / 7
}

/// Earliest date of the set, `None` when empty
pub fn min_date(dates: impl IntoIterator<Item = NaiveDate>) -> Option<NaiveDate> {
    dates.into_iter().min()
}

/// Latest date of the set, `None` when empty
pub fn max_date(dates: impl IntoIterator<Item = NaiveDate>) -> Option<NaiveDate> {
    dates.into_iter().max()
}

pub fn is_same_year(left: NaiveDate, right: NaiveDate) -> bool {
    left.year() == right.year()
}
