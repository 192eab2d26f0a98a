//! Timeline settings
//!
//! Derives the date range shared by all activity rows, chooses between daily
//! and weekly columns and locates the current date on the resulting timeline.
//!
//! # Algorithm
//!
//! 1. `start`/`end` = earliest start and latest end over all tasks
//! 2. Timelines longer than `daily_max_length` days become weekly and are
//!    widened to whole weeks
//! 3. `today` gets 1-based day and week positions when it falls inside
//!    `[start, end]`

use chrono::{NaiveDate, Weekday};
use tracing::debug;

use crate::calendar::{
    difference_in_calendar_days, difference_in_calendar_weeks, end_of_week, max_date, min_date,
    start_of_week,
};
use crate::{
    Activity, ChartError, TimelineGranularity, TimelineSettings, DAILY_GRANULARITY_MAX_LENGTH,
    WEEK_STARTS_ON,
};

/// True when no activity holds a task
///
/// Check this before [`calculate_timeline_settings`], which needs at least
/// one task to bound the timeline.
pub fn is_schedule_empty<'a, S: 'a>(activities: impl IntoIterator<Item = &'a Activity<S>>) -> bool {
    !activities
        .into_iter()
        .any(|activity| !activity.tasks.is_empty())
}

/// Timeline settings with the default week start and daily threshold
pub fn calculate_timeline_settings<'a, S: 'a>(
    activities: impl IntoIterator<Item = &'a Activity<S>>,
    today: NaiveDate,
) -> Result<TimelineSettings, ChartError> {
    TimelineCalculator::default().calculate(activities, today)
}

/// Timeline settings calculator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineCalculator {
    /// Weekday weekly columns start on
    pub week_starts_on: Weekday,
    /// Longest timeline, in days, drawn with daily columns
    pub daily_max_length: i64,
}

impl Default for TimelineCalculator {
    fn default() -> Self {
        Self {
            week_starts_on: WEEK_STARTS_ON,
            daily_max_length: DAILY_GRANULARITY_MAX_LENGTH,
        }
    }
}

impl TimelineCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the first day of the week
    pub fn week_starts_on(mut self, weekday: Weekday) -> Self {
        self.week_starts_on = weekday;
        self
    }

    /// Configure the daily/weekly threshold
    pub fn daily_max_length(mut self, days: i64) -> Self {
        self.daily_max_length = days;
        self
    }

    /// Compute the settings for a set of (sanitized) activities
    ///
    /// Fails with [`ChartError::EmptySchedule`] when there is no task at all.
    pub fn calculate<'a, S: 'a>(
        &self,
        activities: impl IntoIterator<Item = &'a Activity<S>>,
        today: NaiveDate,
    ) -> Result<TimelineSettings, ChartError> {
        let tasks: Vec<_> = activities
            .into_iter()
            .flat_map(|activity| activity.tasks.iter())
            .collect();

        let (Some(mut start), Some(mut end)) = (
            min_date(tasks.iter().map(|task| task.start_date.date())),
            max_date(tasks.iter().map(|task| task.end_date.date())),
        ) else {
            return Err(ChartError::EmptySchedule);
        };

        let mut granularity = TimelineGranularity::Daily;
        let mut duration_in_days = difference_in_calendar_days(end, start) + 1;
        let mut duration_in_weeks = 1;

        if duration_in_days > self.daily_max_length {
            granularity = TimelineGranularity::Weekly;
            start = start_of_week(start, self.week_starts_on);
            end = end_of_week(end, self.week_starts_on);
            duration_in_days = difference_in_calendar_days(end, start) + 1;
            duration_in_weeks = difference_in_calendar_weeks(end, start, self.week_starts_on) + 1;
        }

        let (relative_current_date, relative_current_week) = if start <= today && today <= end {
            let week = match granularity {
                TimelineGranularity::Daily => 1,
                TimelineGranularity::Weekly => {
                    difference_in_calendar_weeks(today, start, self.week_starts_on) + 1
                }
            };
            (
                Some(difference_in_calendar_days(today, start) + 1),
                Some(week),
            )
        } else {
            (None, None)
        };

        debug!(
            %granularity,
            %start,
            %end,
            duration_in_days,
            duration_in_weeks,
            "calculated timeline settings"
        );

        Ok(TimelineSettings {
            granularity,
            start_date: start,
            end_date: end,
            duration_in_days,
            duration_in_weeks,
            relative_current_date,
            relative_current_week,
        })
    }
}

impl TimelineSettings {
    /// Number of timeline columns: days when daily, weeks when weekly
    pub fn column_count(&self) -> i64 {
        match self.granularity {
            TimelineGranularity::Daily => self.duration_in_days,
            TimelineGranularity::Weekly => self.duration_in_weeks,
        }
    }

    /// Whether the 1-based column `n` contains the current date
    pub fn is_current_slot(&self, n: i64) -> bool {
        let current = match self.granularity {
            TimelineGranularity::Daily => self.relative_current_date,
            TimelineGranularity::Weekly => self.relative_current_week,
        };
        current == Some(n)
    }

    /// Days covered by one column
    pub fn days_per_column(&self) -> i64 {
        match self.granularity {
            TimelineGranularity::Daily => 1,
            TimelineGranularity::Weekly => 7,
        }
    }
}
