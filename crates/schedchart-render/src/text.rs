//! Plain text chart renderer
//!
//! Draws a chart as fixed-width lines for terminals and logs:
//!
//! ```text
//! Activities |Day 1 Day 2 Day 3 Day 4 Day 5 | End Date
//!                                  ^
//! -----------+------------------------------+-------------
//! Build      |===============o==============| Oct 5, 2021
//! ```
//!
//! Spans are `=` runs, checkpoints are `o` (tasks start) or `*` (tasks only
//! complete) and the current day is a `|` wherever no span covers it.

use schedchart_core::format::{column_title, format_end_date};
use schedchart_core::{
    ChartRow, Configuration, RenderError, Renderer, ScheduleChart, TimelineGranularity,
    TimelineSettings,
};
use std::ops::Range;

use crate::truncate;

const TITLE_HEADER: &str = "Activities";
const END_DATE_HEADER: &str = "End Date";
const END_DATE_WIDTH: usize = 12;
const PLACEHOLDER: &str = "Timeline";

/// Plain text renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Characters per day on daily timelines
    pub daily_cell_width: usize,
    /// Characters per day on weekly timelines
    pub weekly_cell_width: usize,
    /// Longest activity title before truncation
    pub max_title_width: usize,
    /// Whether to append the symbol legend
    pub show_legend: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            daily_cell_width: 6,
            weekly_cell_width: 1,
            max_title_width: 24,
            show_legend: true,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit the legend line
    pub fn no_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }

    /// Configure the maximum title width
    pub fn max_title_width(mut self, width: usize) -> Self {
        self.max_title_width = width.max(TITLE_HEADER.len());
        self
    }

    fn cell_width(&self, settings: &TimelineSettings) -> usize {
        let width = match settings.granularity {
            TimelineGranularity::Daily => self.daily_cell_width,
            TimelineGranularity::Weekly => self.weekly_cell_width,
        };
        width.max(1)
    }

    fn title_width<S>(&self, rows: &[ChartRow<S>]) -> usize {
        rows.iter()
            .map(|row| row.title.chars().count())
            .chain(std::iter::once(TITLE_HEADER.len()))
            .max()
            .unwrap_or(TITLE_HEADER.len())
            .min(self.max_title_width.max(TITLE_HEADER.len()))
    }

    /// Column titles, centered in their columns
    fn header_cells(&self, settings: &TimelineSettings) -> String {
        let width = self.cell_width(settings) * settings.days_per_column() as usize;
        (1..=settings.column_count())
            .map(|n| {
                let title = truncate(&column_title(settings.granularity, n), width);
                format!("{:^width$}", title, width = width)
            })
            .collect()
    }

    /// `^` under the column holding the current date
    fn current_slot_cells(&self, settings: &TimelineSettings) -> Option<String> {
        let width = self.cell_width(settings) * settings.days_per_column() as usize;
        let slot = (1..=settings.column_count()).find(|n| settings.is_current_slot(*n))?;
        let offset = (slot as usize - 1) * width + width / 2;
        Some(format!("{}^", " ".repeat(offset)))
    }

    fn row_cells<S>(&self, row: &ChartRow<S>, settings: &TimelineSettings) -> String {
        let cell_width = self.cell_width(settings);
        let mut cells = vec![' '; settings.duration_in_days as usize * cell_width];

        if let Some(today) = settings.relative_current_date {
            put(&mut cells, center(today, cell_width), '|');
        }

        for action in &row.actions {
            let bar = day_range(action.relative_start_date, cell_width)
                .zip(day_range(action.relative_end_date, cell_width))
                .map(|(first, last)| first.start..last.end);
            if let Some(bar) = bar {
                for i in bar {
                    put(&mut cells, Some(i), '=');
                }
            }

            if action.single_active_task().is_some() {
                continue;
            }

            for checkpoint in &action.checkpoints {
                let symbol = if checkpoint.is_completion_only() { '*' } else { 'o' };
                put(&mut cells, center(checkpoint.relative_date, cell_width), symbol);
            }
        }

        cells.into_iter().collect()
    }
}

impl<S> Renderer<S> for TextRenderer {
    type Output = String;

    fn render(&self, chart: &ScheduleChart<S>, _configuration: &Configuration<S>) -> Result<String, RenderError> {
        let title_width = self.title_width(&chart.rows);
        let mut lines = Vec::new();

        let header = match &chart.settings {
            Some(settings) => self.header_cells(settings),
            None => format!(" {} ", PLACEHOLDER),
        };
        let timeline_width = header.chars().count();
        lines.push(format!(
            "{:<tw$} |{}| {}",
            TITLE_HEADER,
            header,
            END_DATE_HEADER,
            tw = title_width
        ));

        if let Some(marker) = chart.settings.as_ref().and_then(|s| self.current_slot_cells(s)) {
            lines.push(format!("{:<tw$}  {}", "", marker, tw = title_width));
        }

        lines.push(format!(
            "{}-+{}+-{}",
            "-".repeat(title_width),
            "-".repeat(timeline_width),
            "-".repeat(END_DATE_WIDTH)
        ));

        if let Some(settings) = &chart.settings {
            for row in &chart.rows {
                let end_date = row.latest_completion_date.map(format_end_date).unwrap_or_default();
                lines.push(format!(
                    "{:<tw$} |{}| {}",
                    truncate(&row.title, title_width),
                    self.row_cells(row, settings),
                    end_date,
                    tw = title_width
                ));
            }
        }

        if self.show_legend {
            lines.push(String::new());
            lines.push("= span  o start  * completion  | today  ^ current column".to_string());
        }

        let mut output = String::new();
        for line in lines {
            output.push_str(line.trim_end());
            output.push('\n');
        }
        Ok(output)
    }
}

/// Character range of a 1-based day
fn day_range(day: i64, cell_width: usize) -> Option<Range<usize>> {
    let offset = usize::try_from(day - 1).ok()? * cell_width;
    Some(offset..offset + cell_width)
}

fn center(day: i64, cell_width: usize) -> Option<usize> {
    day_range(day, cell_width).map(|range| range.start + cell_width / 2)
}

fn put(cells: &mut [char], index: Option<usize>, symbol: char) {
    if let Some(cell) = index.and_then(|i| cells.get_mut(i)) {
        *cell = symbol;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use schedchart_core::{Activity, Task};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 10, day).unwrap()
    }

    fn configuration() -> Configuration<&'static str> {
        Configuration::new(|s: &&'static str| *s == "closed", |statuses: &[&'static str]| statuses[0])
    }

    fn render(activities: &[Activity<&'static str>], today: NaiveDate) -> String {
        let configuration = configuration();
        let chart = ScheduleChart::with_defaults(activities, &configuration, today);
        TextRenderer::new().no_legend().render(&chart, &configuration).unwrap()
    }

    #[test]
    fn day_ranges() {
        assert_eq!(day_range(1, 6), Some(0..6));
        assert_eq!(day_range(3, 1), Some(2..3));
        assert_eq!(day_range(0, 6), None);
        assert_eq!(center(2, 6), Some(9));
    }

    #[test]
    fn daily_chart_layout() {
        let activities = vec![Activity::new(1, "Build")
            .task(Task::from_dates("closed", date(1), date(3)))
            .task(Task::from_dates("open", date(3), date(5)))];

        let expected = [
            "Activities |Day 1 Day 2 Day 3 Day 4 Day 5 | End Date".to_string(),
            format!("{}^", " ".repeat(12 + 21)),
            format!("{}+{}+{}", "-".repeat(11), "-".repeat(30), "-".repeat(13)),
            format!("Build      |{}o{}| Oct 5, 2021", "=".repeat(15), "=".repeat(14)),
            String::new(),
        ]
        .join("\n");

        assert_eq!(render(&activities, date(4)), expected);
    }

    #[test]
    fn today_shows_between_spans() {
        let activities = vec![Activity::new(1, "Gap")
            .task(Task::from_dates("closed", date(1), date(1)))
            .task(Task::from_dates("closed", date(3), date(3)))];

        let text = render(&activities, date(2));
        let row = text.lines().find(|l| l.starts_with("Gap")).unwrap();
        assert_eq!(row, format!("{:<10} |===*==   |  ===*==| Oct 3, 2021", "Gap"));
    }

    #[test]
    fn single_open_task_is_a_plain_bar() {
        let activities = vec![Activity::new(1, "Solo").task(Task::from_dates("open", date(1), date(2)))];
        let text = render(&activities, date(20));
        let row = text.lines().find(|l| l.starts_with("Solo")).unwrap();
        assert_eq!(row, format!("{:<10} |{}| Oct 2, 2021", "Solo", "=".repeat(12)));
        assert!(!text.contains('^'));
    }

    #[test]
    fn long_titles_are_truncated() {
        let title = "An activity with a very long descriptive title";
        let activities = vec![Activity::new(1, title).task(Task::from_dates("open", date(1), date(1)))];
        let text = render(&activities, date(20));
        assert!(text.contains("An activity with a ve..."));
        assert!(!text.contains(title));
    }

    #[test]
    fn empty_chart_has_placeholder_column() {
        let text = render(&[], date(1));
        let separator = format!("{}+{}+{}", "-".repeat(11), "-".repeat(10), "-".repeat(13));
        assert_eq!(text, format!("Activities | Timeline | End Date\n{}\n", separator));
    }

    #[test]
    fn legend_is_appended_by_default() {
        let configuration = configuration();
        let chart = ScheduleChart::with_defaults(&[], &configuration, date(1));
        let text = TextRenderer::new().render(&chart, &configuration).unwrap();
        assert!(text.ends_with("^ current column\n"));
    }
}
