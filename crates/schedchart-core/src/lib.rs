//! # schedchart-core
//!
//! Core domain model and layout engine for schedchart Gantt charts.
//!
//! This crate provides:
//! - Domain types: `Activity`, `Task`, `TimelineSettings`, `ScheduleAction`
//! - The layout pipeline: sanitizer, timeline settings calculator,
//!   schedule layout engine and chart assembly
//! - Status configuration (`Configuration`) and the `Renderer` trait
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schedchart_core::{calculate_schedule, Task};
//!
//! let date = |d| NaiveDate::from_ymd_opt(2021, 10, d).unwrap();
//! let tasks = vec![
//!     Task::from_dates("closed", date(1), date(5)),
//!     Task::from_dates("open", date(7), date(10)),
//! ];
//!
//! let spans = calculate_schedule(
//!     &tasks,
//!     date(1),
//!     |status| *status == "closed",
//!     |statuses| statuses[0],
//! );
//!
//! assert_eq!(spans.len(), 2);
//! assert_eq!(spans[0].relative_end_date, 5);
//! assert_eq!(spans[1].relative_start_date, 7);
//! ```

pub mod calendar;
pub mod chart;
pub mod config;
pub mod format;
pub mod layout;
pub mod sanitize;
pub mod timeline;

pub use chart::{ChartRow, ScheduleChart};
pub use config::{ChartSettings, StatusDefinition};
pub use layout::calculate_schedule;
pub use sanitize::remove_malformed_activities;
pub use timeline::{calculate_timeline_settings, is_schedule_empty, TimelineCalculator};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// First day of the week used for weekly timelines
pub const WEEK_STARTS_ON: Weekday = Weekday::Mon;

/// Longest timeline (in days) still rendered with daily columns
pub const DAILY_GRANULARITY_MAX_LENGTH: i64 = 7;

// ============================================================================
// Activities and Tasks
// ============================================================================

/// A single status-tagged time interval
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task<S> {
    pub status: S,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl<S> Task<S> {
    pub fn new(status: S, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            status,
            start_date,
            end_date,
        }
    }

    /// Create a task spanning whole days (both bounds at midnight)
    pub fn from_dates(status: S, start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(
            status,
            start.and_time(NaiveTime::MIN),
            end.and_time(NaiveTime::MIN),
        )
    }
}

/// A named chart row holding one or more tasks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity<S> {
    /// Unique within one input set
    pub id: i64,
    pub title: String,
    pub tasks: Vec<Task<S>>,
}

impl<S> Activity<S> {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Add a task
    pub fn task(mut self, task: Task<S>) -> Self {
        self.tasks.push(task);
        self
    }

    /// Latest end date across the activity's tasks, `None` without tasks
    pub fn latest_completion_date(&self) -> Option<NaiveDate> {
        calendar::max_date(self.tasks.iter().map(|task| task.end_date.date()))
    }
}

/// An activity annotated with its latest completion date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityExtended<S> {
    pub id: i64,
    pub title: String,
    pub tasks: Vec<Task<S>>,
    pub latest_completion_date: Option<NaiveDate>,
}

impl<S> From<Activity<S>> for ActivityExtended<S> {
    fn from(activity: Activity<S>) -> Self {
        let latest_completion_date = activity.latest_completion_date();
        Self {
            id: activity.id,
            title: activity.title,
            tasks: activity.tasks,
            latest_completion_date,
        }
    }
}

/// A task positioned on the timeline
///
/// Relative dates are 1-based day offsets from the timeline start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExtended<S> {
    /// 1-based position inside its span, in start/end order
    pub index: usize,
    pub status: S,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub relative_start_date: i64,
    pub relative_end_date: i64,
}

impl<S: Clone> TaskExtended<S> {
    /// Position a task relative to `start` (index left at 0)
    pub fn from_task(task: &Task<S>, start: NaiveDate) -> Self {
        Self {
            index: 0,
            status: task.status.clone(),
            start_date: task.start_date,
            end_date: task.end_date,
            relative_start_date: relative_date(task.start_date.date(), start),
            relative_end_date: relative_date(task.end_date.date(), start),
        }
    }
}

/// 1-based day offset of `date` from `start`
pub fn relative_date(date: NaiveDate, start: NaiveDate) -> i64 {
    calendar::difference_in_calendar_days(date, start) + 1
}

// ============================================================================
// Timeline
// ============================================================================

/// What a single timeline column represents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelineGranularity {
    Daily,
    Weekly,
}

impl TimelineGranularity {
    /// Header word for a column of this granularity
    pub fn unit_label(&self) -> &'static str {
        match self {
            TimelineGranularity::Daily => "Day",
            TimelineGranularity::Weekly => "Week",
        }
    }
}

impl std::fmt::Display for TimelineGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimelineGranularity::Daily => write!(f, "daily"),
            TimelineGranularity::Weekly => write!(f, "weekly"),
        }
    }
}

/// Global timeline bounds shared by every activity row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSettings {
    pub granularity: TimelineGranularity,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_in_days: i64,
    pub duration_in_weeks: i64,
    /// Day of "today" on the timeline, `None` when outside it
    pub relative_current_date: Option<i64>,
    /// Week of "today" on the timeline, `None` when outside it
    pub relative_current_week: Option<i64>,
}

// ============================================================================
// Schedule
// ============================================================================

/// A day on which tasks of one span start or complete
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCheckpoint<S> {
    pub relative_date: i64,
    pub active_tasks: Vec<TaskExtended<S>>,
    pub completed_tasks: Vec<TaskExtended<S>>,
}

impl<S> ScheduleCheckpoint<S> {
    /// Only completions happen on this day
    pub fn is_completion_only(&self) -> bool {
        self.active_tasks.is_empty()
    }

    /// Number of tasks starting or completing here
    pub fn task_count(&self) -> usize {
        self.active_tasks.len() + self.completed_tasks.len()
    }
}

/// A maximal group of overlapping tasks, drawn as one bar
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAction<S> {
    /// Most relevant status among the member tasks
    pub status: S,
    pub relative_start_date: i64,
    pub relative_end_date: i64,
    /// Ordered by `relative_date`, ascending
    pub checkpoints: Vec<ScheduleCheckpoint<S>>,
}

impl<S> ScheduleAction<S> {
    /// The span's only task, when it is a single task that has not completed
    pub fn single_active_task(&self) -> Option<&TaskExtended<S>> {
        match self.checkpoints.as_slice() {
            [checkpoint]
                if checkpoint.active_tasks.len() == 1 && checkpoint.completed_tasks.is_empty() =>
            {
                checkpoint.active_tasks.first()
            }
            _ => None,
        }
    }

    /// All member tasks, ordered by their index
    pub fn tasks(&self) -> Vec<&TaskExtended<S>> {
        let mut tasks: Vec<&TaskExtended<S>> = self
            .checkpoints
            .iter()
            .flat_map(|c| c.active_tasks.iter().chain(c.completed_tasks.iter()))
            .collect();
        tasks.sort_by_key(|t| t.index);
        tasks
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Display colors for one status
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusColors {
    /// Bar color
    pub primary: String,
    /// Marker color
    pub secondary: String,
}

impl StatusColors {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

type IsCompletedFn<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;
type MostRelevantFn<S> = Arc<dyn Fn(&[S]) -> S + Send + Sync>;

/// Caller-supplied status handling
///
/// The engine never interprets a status itself: completion and priority
/// come from the two strategies bundled here.
pub struct Configuration<S> {
    pub colors: HashMap<S, StatusColors>,
    is_completed: IsCompletedFn<S>,
    most_relevant: MostRelevantFn<S>,
}

impl<S: Clone + Eq + Hash> Configuration<S> {
    pub fn new(
        is_completed: impl Fn(&S) -> bool + Send + Sync + 'static,
        most_relevant: impl Fn(&[S]) -> S + Send + Sync + 'static,
    ) -> Self {
        Self {
            colors: HashMap::new(),
            is_completed: Arc::new(is_completed),
            most_relevant: Arc::new(most_relevant),
        }
    }

    /// Assign display colors to a status
    pub fn color(mut self, status: S, colors: StatusColors) -> Self {
        self.colors.insert(status, colors);
        self
    }

    pub fn colors_for(&self, status: &S) -> Option<&StatusColors> {
        self.colors.get(status)
    }

    pub fn is_completed(&self, status: &S) -> bool {
        (self.is_completed)(status)
    }

    /// Reduce a non-empty set of statuses to the one a span displays
    pub fn most_relevant_status(&self, statuses: &[S]) -> S {
        (self.most_relevant)(statuses)
    }

    /// Lay out one activity's tasks with this configuration's strategies
    pub fn calculate_schedule(&self, tasks: &[Task<S>], start: NaiveDate) -> Vec<ScheduleAction<S>> {
        layout::calculate_schedule(
            tasks,
            start,
            |status| self.is_completed(status),
            |statuses| self.most_relevant_status(statuses),
        )
    }
}

impl<S> Clone for Configuration<S>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            colors: self.colors.clone(),
            is_completed: Arc::clone(&self.is_completed),
            most_relevant: Arc::clone(&self.most_relevant),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Configuration<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer<S> {
    type Output;

    /// Render an assembled chart to the output format
    fn render(
        &self,
        chart: &ScheduleChart<S>,
        configuration: &Configuration<S>,
    ) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Layout error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("Cannot calculate timeline settings: schedule has no tasks")]
    EmptySchedule,
}

/// Status configuration error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No statuses defined")]
    NoStatuses,

    #[error("Duplicate status: {0}")]
    DuplicateStatus(String),

    #[error("Daily granularity length must be positive, got {0}")]
    InvalidDailyMaxLength(i64),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("No colors configured for status: {0}")]
    MissingColor(String),
}

// ============================================================================
// Tests
// ============================================================================
