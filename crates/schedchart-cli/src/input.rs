//! Chart documents
//!
//! A chart document bundles the status settings with the activities to
//! draw. TOML is used for `.toml` files, JSON for everything else:
//!
//! ```toml
//! [settings]
//! weekStartsOn = "Mon"
//!
//! [[settings.statuses]]
//! name = "Closed"
//! primary = "MediumVioletRed"
//! secondary = "Purple"
//! completed = true
//!
//! [[activities]]
//! id = 1
//! title = "Design"
//! tasks = [{ status = "Closed", start = "2021-10-01", end = "2021-10-05" }]
//! ```

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use schedchart_core::{Activity, ChartSettings, Task};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A parsed chart document
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDocument {
    #[serde(default)]
    pub settings: ChartSettings,
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TaskRecord {
    pub status: String,
    pub start: DocumentDate,
    pub end: DocumentDate,
}

/// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct DocumentDate(pub NaiveDateTime);

impl TryFrom<String> for DocumentDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Self(datetime));
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|date| Self(date.and_time(NaiveTime::MIN)))
            .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS", value))
    }
}

impl ChartDocument {
    /// Read and parse a document, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

        let document = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_json(&content),
        };
        document.with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Convert the records to engine activities
    ///
    /// Fails on the first task whose status is not defined in the settings.
    pub fn activities(&self) -> Result<Vec<Activity<String>>> {
        self.activities
            .iter()
            .map(|record| {
                record.tasks.iter().try_fold(
                    Activity::new(record.id, record.title.clone()),
                    |activity, task| {
                        if self.settings.get_status(&task.status).is_none() {
                            bail!(
                                "Activity {} ({}): unknown status '{}'",
                                record.id,
                                record.title,
                                task.status
                            );
                        }
                        Ok(activity.task(Task::new(task.status.clone(), task.start.0, task.end.0)))
                    },
                )
            })
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.activities.iter().map(|a| a.tasks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_DOC: &str = r#"
[settings]
dailyMaxLength = 10

[[settings.statuses]]
name = "Open"
primary = "LimeGreen"
secondary = "ForestGreen"

[[settings.statuses]]
name = "Closed"
primary = "MediumVioletRed"
secondary = "Purple"
completed = true

[[activities]]
id = 1
title = "Design"
tasks = [
    { status = "Closed", start = "2021-10-01", end = "2021-10-05" },
    { status = "Open", start = "2021-10-05T09:30:00", end = "2021-10-08" },
]

[[activities]]
id = 2
title = "Idle"
"#;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 10, day).unwrap()
    }

    #[test]
    fn parses_toml_document() {
        let doc = ChartDocument::from_toml(TOML_DOC).unwrap();
        assert_eq!(doc.settings.daily_max_length, 10);
        assert_eq!(doc.settings.statuses.len(), 2);
        assert_eq!(doc.activities.len(), 2);
        assert_eq!(doc.task_count(), 2);

        let activities = doc.activities().unwrap();
        assert_eq!(activities[0].tasks[0].start_date, date(1).and_time(NaiveTime::MIN));
        assert_eq!(
            activities[0].tasks[1].start_date,
            date(5).and_hms_opt(9, 30, 0).unwrap()
        );
        assert!(activities[1].tasks.is_empty());
    }

    #[test]
    fn parses_json_document() {
        let json = r#"{
            "settings": { "statuses": [{ "name": "Open", "primary": "a", "secondary": "b" }] },
            "activities": [
                { "id": 3, "title": "Docs", "tasks": [{ "status": "Open", "start": "2021-10-02", "end": "2021-10-04" }] }
            ]
        }"#;
        let doc = ChartDocument::from_json(json).unwrap();
        let activities = doc.activities().unwrap();
        assert_eq!(activities[0].id, 3);
        assert_eq!(activities[0].latest_completion_date(), Some(date(4)));
    }

    #[test]
    fn rejects_bad_dates() {
        let json = r#"{ "activities": [
            { "id": 1, "title": "X", "tasks": [{ "status": "Open", "start": "10/02/2021", "end": "2021-10-04" }] }
        ] }"#;
        let err = ChartDocument::from_json(json).unwrap_err();
        assert!(err.to_string().contains("invalid date '10/02/2021'"));
    }

    #[test]
    fn unknown_status_names_activity() {
        let json = r#"{
            "settings": { "statuses": [{ "name": "Open", "primary": "a", "secondary": "b" }] },
            "activities": [
                { "id": 9, "title": "Ops", "tasks": [{ "status": "Blocked", "start": "2021-10-02", "end": "2021-10-04" }] }
            ]
        }"#;
        let doc = ChartDocument::from_json(json).unwrap();
        let err = doc.activities().unwrap_err();
        assert_eq!(err.to_string(), "Activity 9 (Ops): unknown status 'Blocked'");
    }

    #[test]
    fn date_formats() {
        assert_eq!(
            DocumentDate::try_from("2021-10-02".to_string()).unwrap(),
            DocumentDate(date(2).and_time(NaiveTime::MIN))
        );
        assert_eq!(
            DocumentDate::try_from("2021-10-02T18:05:00".to_string()).unwrap(),
            DocumentDate(date(2).and_hms_opt(18, 5, 0).unwrap())
        );
        assert!(DocumentDate::try_from("2021-13-02".to_string()).is_err());
    }
}
