//! Statistics view: totals, confidence histogram, province and district rollups.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::{key_hints, render_footer, render_header};
use crate::application::{StatisticsReport, TimeRange};
use crate::domain::DistrictStatsTable;
use crate::tui::styles::SafeCellTheme;

/// Days of daily counts shown under the summary.
const DAILY_ROWS: usize = 4;

/// Districts listed in the ranking panel.
const TOP_DISTRICTS: usize = 8;

/// Statistics state
#[derive(Debug, Clone, Default)]
pub struct StatisticsState {
    /// One report per [`TimeRange`], built from a single load
    pub reports: Vec<StatisticsReport>,
    pub range: TimeRange,
    pub districts: DistrictStatsTable,
}

impl StatisticsState {
    /// Report for the selected range.
    #[must_use]
    pub fn current(&self) -> Option<&StatisticsReport> {
        self.reports.iter().find(|r| r.range == self.range)
    }

    pub fn next_range(&mut self) {
        self.range = self.range.next();
    }
}

/// Render the statistics view
pub fn render_statistics(f: &mut Frame, area: Rect, state: &StatisticsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let subtitle = match state.current() {
        Some(report) => format!("{} │ source: {}", state.range.label(), report.source),
        None => state.range.label().to_string(),
    };
    render_header(f, chunks[0], "Statistics", &subtitle);

    match state.current() {
        Some(report) => render_content(f, chunks[1], report, &state.districts),
        None => render_empty(f, chunks[1]),
    }

    render_footer(
        f,
        chunks[2],
        key_hints(&[("T", "Time Range"), ("R", "Refresh"), ("Esc", "Back")]),
    );
}

fn render_empty(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No statistics loaded", SafeCellTheme::text_muted())),
        Line::from(""),
        Line::from(Span::styled("Press [R] to refresh", SafeCellTheme::text_secondary())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(SafeCellTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_content(f: &mut Frame, area: Rect, report: &StatisticsReport, districts: &DistrictStatsTable) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(columns[0]);
    render_summary(f, left[0], report);
    render_histogram(f, left[1], report);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(columns[1]);
    render_provinces(f, right[0], report);
    render_districts(f, right[1], districts);
}

fn render_summary(f: &mut Frame, area: Rect, report: &StatisticsReport) {
    let title = if report.is_placeholder() {
        " Summary (sample data) "
    } else {
        " Summary "
    };
    let block = Block::default()
        .title(Span::styled(title, SafeCellTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(SafeCellTheme::border());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Tests: ", SafeCellTheme::text_secondary()),
            Span::styled(report.total.to_string(), SafeCellTheme::text()),
            Span::styled("  Positive: ", SafeCellTheme::text_secondary()),
            Span::styled(report.positive.to_string(), SafeCellTheme::danger()),
            Span::styled("  Negative: ", SafeCellTheme::text_secondary()),
            Span::styled(report.negative.to_string(), SafeCellTheme::success()),
        ]),
        Line::from(vec![
            Span::styled("Positive rate: ", SafeCellTheme::text_secondary()),
            Span::styled(
                format!("{:.1}%", report.positive_rate),
                SafeCellTheme::positive_rate(report.positive_rate),
            ),
        ]),
    ];

    for day in report.daily.iter().rev().take(DAILY_ROWS) {
        lines.push(Line::from(vec![
            Span::styled(day.date.format("%b %d  ").to_string(), SafeCellTheme::text_muted()),
            Span::styled(format!("{} tests", day.total), SafeCellTheme::text()),
            Span::styled(format!(", {} positive", day.positive), SafeCellTheme::text_secondary()),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_histogram(f: &mut Frame, area: Rect, report: &StatisticsReport) {
    let labels: Vec<String> = report.histogram.iter().map(|b| b.label()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&report.histogram)
        .map(|(label, bucket)| (label.as_str(), bucket.count as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(" Confidence Distribution ", SafeCellTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(SafeCellTheme::border()),
        )
        .data(data.as_slice())
        .bar_width(7)
        .bar_gap(1)
        .bar_style(SafeCellTheme::info())
        .value_style(SafeCellTheme::selected())
        .label_style(SafeCellTheme::text_secondary());

    f.render_widget(chart, area);
}

fn render_provinces(f: &mut Frame, area: Rect, report: &StatisticsReport) {
    let header = Row::new(vec!["Province", "Tests", "Positive", "Rate"]).style(SafeCellTheme::header());
    let rows = report.provinces.iter().map(|p| {
        Row::new(vec![
            Cell::from(p.province_name.clone()),
            Cell::from(p.total.to_string()),
            Cell::from(p.positive.to_string()),
            Cell::from(format!("{:.1}%", p.positive_rate))
                .style(SafeCellTheme::positive_rate(p.positive_rate)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(Span::styled(" By Province ", SafeCellTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(SafeCellTheme::border()),
    );

    f.render_widget(table, area);
}

fn render_districts(f: &mut Frame, area: Rect, districts: &DistrictStatsTable) {
    let title = if districts.seeded_from_placeholder {
        " District Hotspots (sample data) "
    } else {
        " District Hotspots "
    };

    let header = Row::new(vec!["District", "Cases", "Positive", "Rate", "Facilities"])
        .style(SafeCellTheme::header());
    let rows = districts.ranked().into_iter().take(TOP_DISTRICTS).map(|d| {
        let rate = d.positive_rate();
        Row::new(vec![
            Cell::from(d.district_name.clone()),
            Cell::from(d.total_cases.to_string()),
            Cell::from(d.positive_cases.to_string()),
            Cell::from(format!("{rate:.1}%")).style(SafeCellTheme::positive_rate(rate)),
            Cell::from(d.facilities.len().to_string()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(32),
            Constraint::Percentage(16),
            Constraint::Percentage(18),
            Constraint::Percentage(16),
            Constraint::Percentage(18),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(Span::styled(title, SafeCellTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(SafeCellTheme::border()),
    );

    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{build_report, DataSource};
    use crate::domain::fixtures::sample_record;
    use crate::domain::DetectionOutcome;
    use chrono::Utc;

    #[test]
    fn test_current_follows_range() {
        let records = vec![sample_record(DetectionOutcome::Positive, 80)];
        let now = Utc::now();
        let mut state = StatisticsState {
            reports: TimeRange::ALL
                .iter()
                .map(|r| build_report(&records, *r, now, DataSource::Local))
                .collect(),
            ..StatisticsState::default()
        };

        assert_eq!(state.current().map(|r| r.range), Some(TimeRange::Week));
        state.next_range();
        assert_eq!(state.current().map(|r| r.range), Some(state.range));
        assert_ne!(state.range, TimeRange::Week);
    }
}
