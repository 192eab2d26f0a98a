//! Chart assembly
//!
//! Runs the full refresh pipeline a presentation layer needs: sanitize the
//! input, annotate latest completion dates, derive timeline settings and lay
//! out every activity row against the shared timeline start.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use tracing::debug;

use crate::sanitize::remove_malformed_activities;
use crate::timeline::{is_schedule_empty, TimelineCalculator};
use crate::{Activity, ActivityExtended, Configuration, ScheduleAction, Task, TimelineSettings};

/// One activity row, ready to draw
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow<S> {
    pub id: i64,
    pub title: String,
    pub latest_completion_date: Option<NaiveDate>,
    /// Sanitized tasks of the activity
    pub tasks: Vec<Task<S>>,
    pub actions: Vec<ScheduleAction<S>>,
}

/// A fully laid out schedule chart
///
/// `settings` is `None` when no valid task remains; such a chart is drawn
/// as a placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleChart<S> {
    pub settings: Option<TimelineSettings>,
    pub rows: Vec<ChartRow<S>>,
}

impl<S: Clone + Eq + Hash> ScheduleChart<S> {
    /// Lay out a chart from raw, possibly malformed, activities
    pub fn build(
        activities: &[Activity<S>],
        configuration: &Configuration<S>,
        calculator: &TimelineCalculator,
        today: NaiveDate,
    ) -> Self {
        let sanitized = remove_malformed_activities(activities);

        let settings = if is_schedule_empty(&sanitized) {
            debug!("schedule is empty, skipping timeline settings");
            None
        } else {
            calculator.calculate(&sanitized, today).ok()
        };

        let rows = sanitized
            .into_iter()
            .map(ActivityExtended::from)
            .map(|activity| {
                let actions = settings
                    .as_ref()
                    .map(|s| configuration.calculate_schedule(&activity.tasks, s.start_date))
                    .unwrap_or_default();
                ChartRow {
                    id: activity.id,
                    title: activity.title,
                    latest_completion_date: activity.latest_completion_date,
                    tasks: activity.tasks,
                    actions,
                }
            })
            .collect();

        Self { settings, rows }
    }

    /// Lay out a chart with the default week start and daily threshold
    pub fn with_defaults(activities: &[Activity<S>], configuration: &Configuration<S>, today: NaiveDate) -> Self {
        Self::build(activities, configuration, &TimelineCalculator::default(), today)
    }
}

impl<S> ScheduleChart<S> {
    pub fn is_empty(&self) -> bool {
        self.settings.is_none()
    }

    /// Number of timeline columns, 1 for the placeholder of an empty chart
    pub fn column_count(&self) -> i64 {
        self.settings.as_ref().map_or(1, TimelineSettings::column_count)
    }

    /// Total number of spans across all rows
    pub fn span_count(&self) -> usize {
        self.rows.iter().map(|row| row.actions.len()).sum()
    }
}
