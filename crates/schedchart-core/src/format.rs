//! Human-readable labels for chart elements

use chrono::{Datelike, NaiveDate};

use crate::calendar::is_same_year;
use crate::{ScheduleCheckpoint, TaskExtended, TimelineGranularity};

/// Describe a task's date range, e.g. `Task 5: Jun 27th - Sep 13th, 2021`
///
/// The year is written once when both dates share it, and the range
/// collapses to one date when start and end coincide.
pub fn format_task_duration(start: NaiveDate, end: NaiveDate, task_number: Option<usize>) -> String {
    let mut range = long_date(end);

    if start != end {
        let formatted_start = if is_same_year(start, end) {
            short_date(start)
        } else {
            long_date(start)
        };
        range = format!("{} - {}", formatted_start, range);
    }

    match task_number {
        Some(number) => format!("Task {}: {}", number, range),
        None => range,
    }
}

/// Date shown in the "End Date" column, e.g. `Nov 25, 2021`
pub fn format_end_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Header of the 1-based timeline column `n`, e.g. `Week 3`
pub fn column_title(granularity: TimelineGranularity, n: i64) -> String {
    format!("{} {}", granularity.unit_label(), n)
}

/// Tooltip of a span drawn as one bar for a single active task
pub fn bar_tooltip<S>(task: &TaskExtended<S>) -> String {
    format_task_duration(task.start_date.date(), task.end_date.date(), None)
}

/// Tooltip lines for a checkpoint marker, completed tasks first
///
/// Lines are numbered unless this is the only checkpoint of its span and it
/// holds a single task.
pub fn checkpoint_tooltip<S>(checkpoint: &ScheduleCheckpoint<S>, single_on_timeline: bool) -> Vec<String> {
    let show_prefix = !single_on_timeline || checkpoint.task_count() > 1;

    checkpoint
        .completed_tasks
        .iter()
        .chain(checkpoint.active_tasks.iter())
        .map(|task| {
            format_task_duration(
                task.start_date.date(),
                task.end_date.date(),
                show_prefix.then_some(task.index),
            )
        })
        .collect()
}

fn short_date(date: NaiveDate) -> String {
    format!("{} {}", date.format("%b"), ordinal(date.day()))
}

fn long_date(date: NaiveDate) -> String {
    format!("{}, {}", short_date(date), date.year())
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 21st ...
fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
