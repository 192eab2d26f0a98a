//! Schedule layout
//!
//! Turns one activity's tasks into the spans drawn on its row.
//!
//! # Algorithm
//!
//! 1. Position every task relative to the timeline start
//! 2. Sort by (start, end)
//! 3. Sweep once, opening a new span when a task starts strictly after the
//!    running end of the current span. Touching tasks (one starts on the day
//!    another ends) stay in the same span.
//! 4. Group each span's tasks into checkpoints: completed tasks on their end
//!    day, all others on their start day
//! 5. Reduce each span's statuses to one with the caller's strategy

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::{ScheduleAction, ScheduleCheckpoint, Task, TaskExtended};

/// Lay out one activity's tasks on a timeline starting at `start`
///
/// `is_completed` decides whether a task is drawn at its completion day,
/// `most_relevant` picks the status a whole span is drawn with. Spans come
/// back ordered by start; an empty task list yields no spans.
pub fn calculate_schedule<S, C, R>(
    tasks: &[Task<S>],
    start: NaiveDate,
    is_completed: C,
    most_relevant: R,
) -> Vec<ScheduleAction<S>>
where
    S: Clone,
    C: Fn(&S) -> bool,
    R: Fn(&[S]) -> S,
{
    let mut extended: Vec<TaskExtended<S>> = tasks
        .iter()
        .map(|task| TaskExtended::from_task(task, start))
        .collect();
    // Stable: equal keys keep input order
    extended.sort_by_key(|task| (task.relative_start_date, task.relative_end_date));

    partition_spans(extended)
        .into_iter()
        .map(|span| build_action(span, &is_completed, &most_relevant))
        .collect()
}

/// Split sorted tasks into overlapping groups and number them per group
fn partition_spans<S>(sorted: Vec<TaskExtended<S>>) -> Vec<Vec<TaskExtended<S>>> {
    let mut spans = Vec::new();
    let mut current: Vec<TaskExtended<S>> = Vec::new();
    let mut current_end = i64::MIN;

    for mut task in sorted {
        if !current.is_empty() && task.relative_start_date > current_end {
            spans.push(std::mem::take(&mut current));
            current_end = i64::MIN;
        }

        task.index = current.len() + 1;
        current_end = current_end.max(task.relative_end_date);
        current.push(task);
    }

    if !current.is_empty() {
        spans.push(current);
    }

    spans
}

fn build_action<S, C, R>(span: Vec<TaskExtended<S>>, is_completed: &C, most_relevant: &R) -> ScheduleAction<S>
where
    S: Clone,
    C: Fn(&S) -> bool,
    R: Fn(&[S]) -> S,
{
    let statuses: Vec<S> = span.iter().map(|task| task.status.clone()).collect();
    let status = most_relevant(&statuses);
    let relative_start_date = span
        .iter()
        .map(|task| task.relative_start_date)
        .min()
        .unwrap_or_default();
    let relative_end_date = span
        .iter()
        .map(|task| task.relative_end_date)
        .max()
        .unwrap_or_default();

    let mut checkpoints: BTreeMap<i64, ScheduleCheckpoint<S>> = BTreeMap::new();
    for task in span {
        let completed = is_completed(&task.status);
        let day = if completed {
            task.relative_end_date
        } else {
            task.relative_start_date
        };

        let checkpoint = checkpoints.entry(day).or_insert_with(|| ScheduleCheckpoint {
            relative_date: day,
            active_tasks: Vec::new(),
            completed_tasks: Vec::new(),
        });
        if completed {
            checkpoint.completed_tasks.push(task);
        } else {
            checkpoint.active_tasks.push(task);
        }
    }

    ScheduleAction {
        status,
        relative_start_date,
        relative_end_date,
        checkpoints: checkpoints.into_values().collect(),
    }
}
