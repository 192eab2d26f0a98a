//! # schedchart-render
//!
//! Rendering backends for schedchart charts.
//!
//! This crate provides:
//! - SVG chart rendering
//! - Plain text rendering for terminals
//!
//! Both consume a laid out [`ScheduleChart`] and never compute layout
//! themselves.
//!
//! ## Example
//!
//! ```rust,ignore
//! use schedchart_core::{Renderer, ScheduleChart};
//! use schedchart_render::{SvgRenderer, TextRenderer};
//!
//! let chart = ScheduleChart::with_defaults(&activities, &configuration, today);
//!
//! let svg = SvgRenderer::default().render(&chart, &configuration)?;
//! let text = TextRenderer::new().render(&chart, &configuration)?;
//! ```

pub mod text;

pub use text::TextRenderer;

use schedchart_core::format::{bar_tooltip, checkpoint_tooltip, column_title, format_end_date};
use schedchart_core::{
    ChartRow, Configuration, RenderError, Renderer, ScheduleAction, ScheduleChart, StatusColors,
    TimelineSettings,
};
use std::fmt::Debug;
use std::hash::Hash;
use svg::node::element::{Circle, Element, Group, Line, Path, Rectangle, Text};
use svg::{Document, Node};

/// SVG chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Width of one timeline column in pixels
    pub column_width: u32,
    /// Height per activity row in pixels
    pub row_height: u32,
    /// Width of the activity title column in pixels
    pub label_width: u32,
    /// Width of the end date column in pixels
    pub end_date_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Color of the current date line and header marker
    pub today_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            column_width: 70,
            row_height: 36,
            label_width: 140,
            end_date_width: 120,
            header_height: 48,
            padding: 20,
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            today_color: "#606d7f".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure column width
    pub fn column_width(mut self, width: u32) -> Self {
        self.column_width = width;
        self
    }

    /// Configure row height
    pub fn row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    fn chart_left(&self) -> f64 {
        f64::from(self.padding + self.label_width)
    }

    fn chart_width(&self, columns: i64) -> f64 {
        columns as f64 * f64::from(self.column_width)
    }

    fn total_width(&self, columns: i64) -> f64 {
        f64::from(self.padding * 2 + self.label_width + self.end_date_width) + self.chart_width(columns)
    }

    /// Rows drawn, including the placeholder row of an empty chart
    fn total_height(&self, rows: usize) -> f64 {
        let rows = rows.max(1) as f64;
        f64::from(self.padding * 2 + self.header_height) + rows * f64::from(self.row_height)
    }

    fn day_width(&self, settings: &TimelineSettings) -> f64 {
        f64::from(self.column_width) / settings.days_per_column() as f64
    }

    /// Left edge of a 1-based relative day
    fn day_to_x(&self, day: i64, day_width: f64) -> f64 {
        self.chart_left() + (day - 1) as f64 * day_width
    }

    fn row_top(&self, row: usize) -> f64 {
        f64::from(self.padding + self.header_height) + row as f64 * f64::from(self.row_height)
    }

    fn text(&self, content: impl Into<String>, x: f64, y: f64) -> Text {
        Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str())
    }

    /// Column titles, the fixed side headers and the current slot marker
    fn render_header(&self, settings: Option<&TimelineSettings>, columns: i64) -> Group {
        let mut group = Group::new().set("class", "header");
        let top = f64::from(self.padding);
        let baseline = top + f64::from(self.header_height) / 2.0 + 4.0;

        let background = Rectangle::new()
            .set("x", top)
            .set("y", top)
            .set("width", self.total_width(columns) - 2.0 * top)
            .set("height", self.header_height)
            .set("fill", "#f8f9fa");
        group = group.add(background);

        group = group.add(
            self.text("Activities", top + f64::from(self.label_width) / 2.0, baseline)
                .set("text-anchor", "middle")
                .set("font-weight", "bold"),
        );

        let column_width = f64::from(self.column_width);
        match settings {
            Some(settings) => {
                for n in 1..=columns {
                    let center = self.chart_left() + (n as f64 - 0.5) * column_width;
                    group = group.add(
                        self.text(column_title(settings.granularity, n), center, baseline)
                            .set("text-anchor", "middle"),
                    );

                    if settings.is_current_slot(n) {
                        let marker = Rectangle::new()
                            .set("class", "current-slot")
                            .set("x", center - column_width / 2.0 + 6.0)
                            .set("y", top + f64::from(self.header_height) - 8.0)
                            .set("width", column_width - 12.0)
                            .set("height", 4)
                            .set("rx", 2)
                            .set("fill", self.today_color.as_str());
                        group = group.add(marker);
                    }
                }
            }
            None => {
                let center = self.chart_left() + self.chart_width(columns) / 2.0;
                group = group.add(self.text("Timeline", center, baseline).set("text-anchor", "middle"));
            }
        }

        let end_center = self.chart_left() + self.chart_width(columns) + f64::from(self.end_date_width) / 2.0;
        group = group.add(
            self.text("End Date", end_center, baseline)
                .set("text-anchor", "middle")
                .set("font-weight", "bold"),
        );

        group
    }

    fn render_grid(&self, rows: usize, columns: i64) -> Group {
        let mut group = Group::new().set("class", "grid");
        let top = self.row_top(0);
        let bottom = self.row_top(rows.max(1));
        let left = f64::from(self.padding);
        let right = self.total_width(columns) - left;

        for i in 0..=rows.max(1) {
            let y = self.row_top(i);
            group = group.add(
                Line::new()
                    .set("x1", left)
                    .set("y1", y)
                    .set("x2", right)
                    .set("y2", y)
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", 1),
            );
        }

        for n in 0..=columns {
            let x = self.chart_left() + n as f64 * f64::from(self.column_width);
            group = group.add(
                Line::new()
                    .set("x1", x)
                    .set("y1", top)
                    .set("x2", x)
                    .set("y2", bottom)
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", 1),
            );
        }

        group
    }

    /// One span: a bar, plus checkpoint markers unless it is a lone open task
    fn render_action<S>(&self, action: &ScheduleAction<S>, colors: &StatusColors, row: usize, day_width: f64) -> Group {
        let mut group = Group::new().set("class", "span");
        let top = self.row_top(row);
        let row_height = f64::from(self.row_height);
        let center_y = top + row_height / 2.0;

        let x_start = self.day_to_x(action.relative_start_date, day_width) + 2.0;
        let x_end = self.day_to_x(action.relative_end_date + 1, day_width) - 2.0;
        let mut bar = Rectangle::new()
            .set("class", "timeline-bar")
            .set("x", x_start)
            .set("y", top + 10.0)
            .set("width", (x_end - x_start).max(4.0))
            .set("height", row_height - 20.0)
            .set("rx", 4)
            .set("ry", 4)
            .set("fill", colors.primary.as_str());

        if let Some(task) = action.single_active_task() {
            bar.append(tooltip(&[bar_tooltip(task)]));
            return group.add(bar);
        }
        group = group.add(bar);

        let single_on_timeline = action.checkpoints.len() == 1;
        for checkpoint in &action.checkpoints {
            let cx = self.day_to_x(checkpoint.relative_date, day_width) + day_width / 2.0;
            let lines = checkpoint_tooltip(checkpoint, single_on_timeline);

            let mut marker = if checkpoint.is_completion_only() {
                let check = Path::new()
                    .set(
                        "d",
                        format!(
                            "M {} {} L {} {} L {} {}",
                            cx - 3.0,
                            center_y,
                            cx - 1.0,
                            center_y + 2.5,
                            cx + 3.5,
                            center_y - 2.5
                        ),
                    )
                    .set("stroke", "#ffffff")
                    .set("stroke-width", 1.5)
                    .set("fill", "none");
                Group::new()
                    .set("class", "timeline-end-marker")
                    .add(
                        Circle::new()
                            .set("cx", cx)
                            .set("cy", center_y)
                            .set("r", 6)
                            .set("fill", colors.secondary.as_str()),
                    )
                    .add(check)
            } else {
                Group::new().set("class", "timeline-start-marker").add(
                    Circle::new()
                        .set("cx", cx)
                        .set("cy", center_y)
                        .set("r", 6)
                        .set("fill", colors.secondary.as_str()),
                )
            };
            marker.append(tooltip(&lines));
            group = group.add(marker);
        }

        group
    }

    fn render_row<S>(
        &self,
        row: &ChartRow<S>,
        index: usize,
        settings: Option<&TimelineSettings>,
        columns: i64,
        configuration: &Configuration<S>,
    ) -> Result<Group, RenderError>
    where
        S: Clone + Eq + Hash + Debug,
    {
        let mut group = Group::new().set("class", "activity").set("data-id", row.id.to_string());
        let baseline = self.row_top(index) + f64::from(self.row_height) / 2.0 + 4.0;

        group = group.add(self.text(truncate(&row.title, 20), f64::from(self.padding) + 8.0, baseline));

        if let Some(settings) = settings {
            let day_width = self.day_width(settings);
            for action in &row.actions {
                let colors = configuration
                    .colors_for(&action.status)
                    .ok_or_else(|| RenderError::MissingColor(format!("{:?}", action.status)))?;
                group = group.add(self.render_action(action, colors, index, day_width));
            }
        }

        if let Some(end) = row.latest_completion_date {
            let x = self.chart_left() + self.chart_width(columns) + f64::from(self.end_date_width) / 2.0;
            group = group.add(self.text(format_end_date(end), x, baseline).set("text-anchor", "middle"));
        }

        Ok(group)
    }

    /// Dashed vertical line through the current day
    fn render_today(&self, settings: &TimelineSettings, rows: usize) -> Option<Line> {
        let day = settings.relative_current_date?;
        let day_width = self.day_width(settings);
        let x = self.day_to_x(day, day_width) + day_width / 2.0;

        Some(
            Line::new()
                .set("class", "current-day")
                .set("x1", x)
                .set("y1", self.row_top(0))
                .set("x2", x)
                .set("y2", self.row_top(rows.max(1)))
                .set("stroke", self.today_color.as_str())
                .set("stroke-width", 1)
                .set("stroke-dasharray", "4 3"),
        )
    }
}

impl<S> Renderer<S> for SvgRenderer
where
    S: Clone + Eq + Hash + Debug,
{
    type Output = String;

    fn render(&self, chart: &ScheduleChart<S>, configuration: &Configuration<S>) -> Result<String, RenderError> {
        let columns = chart.column_count();
        let settings = chart.settings.as_ref();
        let width = self.total_width(columns);
        let height = self.total_height(chart.rows.len());

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        document = document.add(self.render_grid(chart.rows.len(), columns));
        document = document.add(self.render_header(settings, columns));

        for (index, row) in chart.rows.iter().enumerate() {
            document = document.add(self.render_row(row, index, settings, columns, configuration)?);
        }

        if let Some(line) = settings.and_then(|s| self.render_today(s, chart.rows.len())) {
            document = document.add(line);
        }

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// `<title>` child shown as a tooltip
fn tooltip(lines: &[String]) -> Element {
    let mut title = Element::new("title");
    title.append(svg::node::Text::new(lines.join("\n")));
    title
}

/// Truncate a string to a maximum number of characters with ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use schedchart_core::{Activity, Task};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 10, day).unwrap()
    }

    fn configuration() -> Configuration<&'static str> {
        Configuration::new(|s: &&'static str| *s == "closed", |statuses: &[&'static str]| statuses[0])
            .color("open", StatusColors::new("LimeGreen", "ForestGreen"))
            .color("closed", StatusColors::new("MediumVioletRed", "Purple"))
    }

    fn chart(activities: &[Activity<&'static str>], today: NaiveDate) -> ScheduleChart<&'static str> {
        ScheduleChart::with_defaults(activities, &configuration(), today)
    }

    #[test]
    fn truncate_keeps_short_titles() {
        assert_eq!(truncate("Design", 20), "Design");
        assert_eq!(truncate("A very long activity title", 10), "A very ...");
    }

    #[test]
    fn dimensions_follow_columns_and_rows() {
        let renderer = SvgRenderer::default();
        assert_eq!(renderer.total_width(5), 40.0 + 140.0 + 120.0 + 350.0);
        assert_eq!(renderer.total_height(0), renderer.total_height(1));
        assert_eq!(renderer.total_height(3), 40.0 + 48.0 + 3.0 * 36.0);
    }

    #[test]
    fn renders_columns_bars_and_today() {
        let activities = vec![Activity::new(1, "Build")
            .task(Task::from_dates("closed", date(1), date(3)))
            .task(Task::from_dates("open", date(3), date(5)))];
        let svg = SvgRenderer::default()
            .render(&chart(&activities, date(4)), &configuration())
            .unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Day 1"));
        assert!(svg.contains("Day 5"));
        assert!(!svg.contains("Day 6"));
        assert!(svg.contains("timeline-bar"));
        assert!(svg.contains("timeline-start-marker"));
        assert!(svg.contains("current-slot"));
        assert!(svg.contains("current-day"));
        assert!(svg.contains("Oct 5, 2021"));
        // Span status is the first one, closed
        assert!(svg.contains("MediumVioletRed"));
    }

    #[test]
    fn single_open_task_has_no_markers() {
        let activities = vec![Activity::new(1, "Solo").task(Task::from_dates("open", date(1), date(2)))];
        let svg = SvgRenderer::default()
            .render(&chart(&activities, date(20)), &configuration())
            .unwrap();

        assert!(svg.contains("timeline-bar"));
        assert!(!svg.contains("timeline-start-marker"));
        assert!(!svg.contains("current-day"));
        assert!(svg.contains("Oct 1st - Oct 2nd, 2021"));
    }

    #[test]
    fn completed_task_gets_end_marker() {
        let activities = vec![Activity::new(1, "Done").task(Task::from_dates("closed", date(1), date(2)))];
        let svg = SvgRenderer::default()
            .render(&chart(&activities, date(20)), &configuration())
            .unwrap();
        assert!(svg.contains("timeline-end-marker"));
    }

    #[test]
    fn empty_chart_renders_placeholder() {
        let svg = SvgRenderer::default()
            .render(&chart(&[], date(1)), &configuration())
            .unwrap();
        assert!(svg.contains("Timeline"));
        assert!(svg.contains("End Date"));
        assert!(!svg.contains("Day 1"));
    }

    #[test]
    fn missing_color_is_an_error() {
        let activities = vec![Activity::new(1, "Odd").task(Task::from_dates("blocked", date(1), date(2)))];
        let result = SvgRenderer::default().render(&chart(&activities, date(1)), &configuration());
        assert!(matches!(result, Err(RenderError::MissingColor(s)) if s.contains("blocked")));
    }
}
