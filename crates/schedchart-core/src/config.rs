//! Declarative status configuration
//!
//! `ChartSettings` describes a set of named statuses (colors, completion,
//! priority) in a form that can be loaded from TOML or JSON, and turns it
//! into the strategy-based [`Configuration`] the engine works with.
//!
//! ```toml
//! weekStartsOn = "Mon"
//!
//! [[statuses]]
//! name = "InProgress"
//! primary = "Gold"
//! secondary = "GoldenRod"
//! priority = 2
//!
//! [[statuses]]
//! name = "Closed"
//! primary = "MediumVioletRed"
//! secondary = "Purple"
//! completed = true
//! ```

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::{
    ConfigError, Configuration, StatusColors, TimelineCalculator, DAILY_GRANULARITY_MAX_LENGTH,
    WEEK_STARTS_ON,
};

/// One named status
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDefinition {
    pub name: String,
    /// Bar color
    pub primary: String,
    /// Marker color
    pub secondary: String,
    /// Tasks with this status are drawn at their completion day
    #[serde(default)]
    pub completed: bool,
    /// Higher wins when a span mixes statuses
    #[serde(default)]
    pub priority: i32,
}

impl StatusDefinition {
    pub fn new(name: impl Into<String>, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary: primary.into(),
            secondary: secondary.into(),
            completed: false,
            priority: 0,
        }
    }

    /// Mark as a completion status
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Chart-wide settings for string statuses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    #[serde(default = "default_week_starts_on")]
    pub week_starts_on: Weekday,
    #[serde(default = "default_daily_max_length")]
    pub daily_max_length: i64,
    #[serde(default)]
    pub statuses: Vec<StatusDefinition>,
}

fn default_week_starts_on() -> Weekday {
    WEEK_STARTS_ON
}

fn default_daily_max_length() -> i64 {
    DAILY_GRANULARITY_MAX_LENGTH
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            week_starts_on: default_week_starts_on(),
            daily_max_length: default_daily_max_length(),
            statuses: Vec::new(),
        }
    }
}

impl ChartSettings {
    /// Add a status definition
    pub fn status(mut self, status: StatusDefinition) -> Self {
        self.statuses.push(status);
        self
    }

    /// Look up a status by name
    pub fn get_status(&self, name: &str) -> Option<&StatusDefinition> {
        self.statuses.iter().find(|s| s.name == name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.statuses.is_empty() {
            return Err(ConfigError::NoStatuses);
        }
        if self.daily_max_length < 1 {
            return Err(ConfigError::InvalidDailyMaxLength(self.daily_max_length));
        }

        let mut seen = HashSet::new();
        for status in &self.statuses {
            if !seen.insert(status.name.as_str()) {
                return Err(ConfigError::DuplicateStatus(status.name.clone()));
            }
        }

        Ok(())
    }

    /// Build the engine configuration
    ///
    /// Completion comes from each definition's `completed` flag; a span
    /// shows its highest-priority status, the earliest one on ties.
    pub fn configuration(&self) -> Result<Configuration<String>, ConfigError> {
        self.validate()?;

        let completed: HashSet<String> = self
            .statuses
            .iter()
            .filter(|s| s.completed)
            .map(|s| s.name.clone())
            .collect();
        let priorities: HashMap<String, i32> = self
            .statuses
            .iter()
            .map(|s| (s.name.clone(), s.priority))
            .collect();

        let configuration = Configuration::new(
            move |status: &String| completed.contains(status),
            move |statuses: &[String]| {
                statuses
                    .iter()
                    .rev()
                    .max_by_key(|s| priorities.get(*s).copied().unwrap_or(i32::MIN))
                    .cloned()
                    .unwrap_or_default()
            },
        );

        Ok(self.statuses.iter().fold(configuration, |config, s| {
            config.color(s.name.clone(), StatusColors::new(&s.primary, &s.secondary))
        }))
    }

    /// Timeline calculator using these settings
    pub fn calculator(&self) -> TimelineCalculator {
        TimelineCalculator::new()
            .week_starts_on(self.week_starts_on)
            .daily_max_length(self.daily_max_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ChartSettings {
        ChartSettings::default()
            .status(StatusDefinition::new("Open", "LimeGreen", "ForestGreen").priority(1))
            .status(StatusDefinition::new("InProgress", "Gold", "GoldenRod").priority(2))
            .status(StatusDefinition::new("Closed", "MediumVioletRed", "Purple").completed())
    }

    fn names(statuses: &[&str]) -> Vec<String> {
        statuses.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults() {
        let settings = ChartSettings::default();
        assert_eq!(settings.week_starts_on, Weekday::Mon);
        assert_eq!(settings.daily_max_length, 7);
        assert_eq!(settings.validate(), Err(ConfigError::NoStatuses));
    }

    #[test]
    fn rejects_duplicates_and_bad_threshold() {
        let dup = settings().status(StatusDefinition::new("Open", "a", "b"));
        assert_eq!(dup.validate(), Err(ConfigError::DuplicateStatus("Open".into())));

        let mut bad = settings();
        bad.daily_max_length = 0;
        assert_eq!(bad.validate(), Err(ConfigError::InvalidDailyMaxLength(0)));
    }

    #[test]
    fn configuration_strategies() {
        let config = settings().configuration().unwrap();

        assert!(config.is_completed(&"Closed".to_string()));
        assert!(!config.is_completed(&"Open".to_string()));
        assert_eq!(config.most_relevant_status(&names(&["Closed", "InProgress", "Open"])), "InProgress");
        assert_eq!(config.most_relevant_status(&names(&["Closed", "Closed"])), "Closed");
        assert_eq!(
            config.colors_for(&"InProgress".to_string()),
            Some(&StatusColors::new("Gold", "GoldenRod"))
        );
    }

    #[test]
    fn ties_keep_first_status() {
        let config = ChartSettings::default()
            .status(StatusDefinition::new("A", "red", "red"))
            .status(StatusDefinition::new("B", "blue", "blue"))
            .configuration()
            .unwrap();
        assert_eq!(config.most_relevant_status(&names(&["B", "A"])), "B");
        assert_eq!(config.most_relevant_status(&names(&["A", "B"])), "A");
    }

    #[test]
    fn calculator_follows_settings() {
        let mut settings = settings();
        settings.week_starts_on = Weekday::Sun;
        settings.daily_max_length = 14;
        let calculator = settings.calculator();
        assert_eq!(calculator.week_starts_on, Weekday::Sun);
        assert_eq!(calculator.daily_max_length, 14);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "statuses": [
                { "name": "Done", "primary": "green", "secondary": "darkgreen", "completed": true }
            ]
        }"#;
        let settings: ChartSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.week_starts_on, Weekday::Mon);
        assert_eq!(settings.daily_max_length, 7);
        let done = settings.get_status("Done").unwrap();
        assert!(done.completed);
        assert_eq!(done.priority, 0);
    }

    #[test]
    fn deserializes_weekday_names() {
        let settings: ChartSettings =
            serde_json::from_str(r#"{ "weekStartsOn": "Sun", "statuses": [] }"#).unwrap();
        assert_eq!(settings.week_starts_on, Weekday::Sun);
    }
}
