//! Rendering tests driven by declarative status settings

use chrono::NaiveDate;
use schedchart_core::{
    Activity, ChartSettings, Configuration, Renderer, ScheduleChart, StatusDefinition, Task,
};
use schedchart_render::{SvgRenderer, TextRenderer};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn task(status: &str, start: NaiveDate, end: NaiveDate) -> Task<String> {
    Task::from_dates(status.to_string(), start, end)
}

fn settings() -> ChartSettings {
    ChartSettings::default()
        .status(StatusDefinition::new("Open", "LimeGreen", "ForestGreen").priority(1))
        .status(StatusDefinition::new("InProgress", "Gold", "GoldenRod").priority(2))
        .status(StatusDefinition::new("Closed", "MediumVioletRed", "Purple").completed())
}

fn weekly_project() -> (ScheduleChart<String>, Configuration<String>) {
    let activities = vec![
        Activity::new(1, "Research")
            .task(task("Closed", date(2021, 10, 4), date(2021, 10, 8)))
            .task(task("InProgress", date(2021, 10, 8), date(2021, 10, 15))),
        Activity::new(2, "Release").task(task("Open", date(2021, 10, 20), date(2021, 10, 22))),
        Activity::new(3, "Skipped").task(task("Open", date(2021, 10, 9), date(2021, 10, 1))),
    ];
    let configuration = settings().configuration().unwrap();
    let chart = ScheduleChart::build(&activities, &configuration, &settings().calculator(), date(2021, 10, 13));
    (chart, configuration)
}

// ============================================================================
// SVG
// ============================================================================

#[test]
fn svg_weekly_chart() {
    let (chart, configuration) = weekly_project();
    let svg = SvgRenderer::default().render(&chart, &configuration).unwrap();

    assert!(svg.contains("Week 1"));
    assert!(svg.contains("Week 3"));
    assert!(!svg.contains("Week 4"));
    assert!(svg.contains("Research"));
    assert!(svg.contains("Release"));
    assert!(!svg.contains("Skipped"));
    // Highest priority status of the merged span
    assert!(svg.contains("Gold"));
    assert!(svg.contains("Task 1: Oct 4th - Oct 8th, 2021"));
    assert!(svg.contains("Oct 15, 2021"));
    assert!(svg.contains("Oct 22, 2021"));
}

#[test]
fn svg_column_width_scales_document() {
    let (chart, configuration) = weekly_project();
    let narrow = SvgRenderer::default().column_width(40).render(&chart, &configuration).unwrap();
    let wide = SvgRenderer::default().column_width(120).render(&chart, &configuration).unwrap();

    // 20 + 140 + 3 columns + 120 + 20
    assert!(narrow.contains("width=\"420\""));
    assert!(wide.contains("width=\"660\""));
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn text_weekly_chart() {
    let (chart, configuration) = weekly_project();
    let text = TextRenderer::new().render(&chart, &configuration).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Activities |Week 1 Week 2 Week 3 | End Date");
    // Oct 13 is in the second week of a timeline starting Mon Oct 4
    assert_eq!(lines[1], format!("{}^", " ".repeat(12 + 7 + 3)));
    assert!(lines[3].starts_with("Research   |"));
    assert!(lines[3].ends_with("| Oct 15, 2021"));
    assert!(lines[4].starts_with("Release    |"));
    assert!(!text.contains("Skipped"));
}

#[test]
fn text_rows_have_equal_timeline_width() {
    let (chart, configuration) = weekly_project();
    let text = TextRenderer::new().no_legend().render(&chart, &configuration).unwrap();

    let bars: Vec<usize> = text
        .lines()
        .filter(|line| line.starts_with("Research") || line.starts_with("Release"))
        .map(|line| line.rfind('|').unwrap())
        .collect();
    assert_eq!(bars, vec![11 + 1 + 21, 11 + 1 + 21]);
}
