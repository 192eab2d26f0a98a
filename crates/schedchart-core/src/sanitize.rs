//! Input sanitization
//!
//! Malformed input never aborts a render: tasks ending before they start are
//! dropped, then activities without tasks are dropped. Dates are truncated to
//! midnight so that nothing downstream sees a time of day.

use crate::calendar::start_of_day;
use crate::{Activity, Task};
use tracing::debug;

/// Normalize dates and drop malformed tasks and empty activities
///
/// Returns fresh activities in input order; the input is left untouched.
pub fn remove_malformed_activities<S: Clone>(activities: &[Activity<S>]) -> Vec<Activity<S>> {
    activities
        .iter()
        .filter_map(|activity| {
            let tasks: Vec<Task<S>> = activity
                .tasks
                .iter()
                .map(normalize_task)
                .filter(|task| task.start_date <= task.end_date)
                .collect();

            let dropped = activity.tasks.len() - tasks.len();
            if dropped > 0 {
                debug!(activity = activity.id, dropped, "dropped tasks ending before they start");
            }

            if tasks.is_empty() {
                debug!(activity = activity.id, "dropped activity without valid tasks");
                return None;
            }

            Some(Activity {
                id: activity.id,
                title: activity.title.clone(),
                tasks,
            })
        })
        .collect()
}

fn normalize_task<S: Clone>(task: &Task<S>) -> Task<S> {
    Task {
        status: task.status.clone(),
        start_date: start_of_day(task.start_date),
        end_date: start_of_day(task.end_date),
    }
}
