//! Records view: filterable list of stored detections.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::{key_hints, render_footer, render_header};
use crate::application::DetectionFilter;
use crate::domain::DetectionRecord;
use crate::reference::ReferenceTable;
use crate::tui::styles::SafeCellTheme;

/// Records state
#[derive(Debug, Clone, Default)]
pub struct RecordsState {
    pub filter: DetectionFilter,
    /// Records matching the filter, newest first
    pub records: Vec<DetectionRecord>,
    pub total_stored: usize,
    pub selected: usize,
    /// Keystrokes go to the patient query
    pub editing_query: bool,
    /// Location filters are only offered to admins
    pub admin: bool,
    pub status: Option<String>,
}

/// Next id after `current` in `ids`, wrapping to "any".
fn cycle_id(ids: &[&'static str], current: Option<&str>) -> Option<String> {
    match current.and_then(|c| ids.iter().position(|id| *id == c)) {
        None => ids.first().map(|id| (*id).to_string()),
        Some(i) => ids.get(i + 1).map(|id| (*id).to_string()),
    }
}

impl RecordsState {
    pub fn set_records(&mut self, records: Vec<DetectionRecord>, total_stored: usize) {
        self.records = records;
        self.total_stored = total_stored;
        if self.selected >= self.records.len() {
            self.selected = self.records.len().saturating_sub(1);
        }
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&DetectionRecord> {
        self.records.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Step the province filter through the reference provinces, then back
    /// to any. The district filter is dropped.
    pub fn cycle_province(&mut self, table: &ReferenceTable) {
        let ids: Vec<&'static str> = table.provinces().iter().map(|o| o.value).collect();
        self.filter.province = cycle_id(&ids, self.filter.province.as_deref());
        self.filter.district = None;
        self.selected = 0;
    }

    /// Step the district filter through the selected province's districts.
    /// Does nothing without a province filter.
    pub fn cycle_district(&mut self, table: &ReferenceTable) {
        let Some(province) = self.filter.province.as_deref() else {
            return;
        };
        let ids: Vec<&'static str> = table.districts_of(province).iter().map(|o| o.value).collect();
        self.filter.district = cycle_id(&ids, self.filter.district.as_deref());
        self.selected = 0;
    }

    pub fn clear_filter(&mut self) {
        self.filter = DetectionFilter::default();
        self.selected = 0;
    }
}

/// Render the records view
pub fn render_records(f: &mut Frame, area: Rect, state: &RecordsState, table: &ReferenceTable) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Filter
            Constraint::Min(0),    // Table
            Constraint::Length(4), // Detail
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Records", "Detections Stored On This Device");
    render_filter(f, chunks[1], state, table);
    render_table(f, chunks[2], state);
    render_detail(f, chunks[3], state);

    let footer = if state.editing_query {
        key_hints(&[("Enter", "Apply"), ("Esc", "Cancel")])
    } else if let Some(status) = &state.status {
        Line::from(Span::styled(status.clone(), SafeCellTheme::info()))
    } else if state.admin {
        key_hints(&[
            ("O", "Outcome"),
            ("T", "Range"),
            ("/", "Patient"),
            ("P", "Province"),
            ("D", "District"),
            ("Del", "Clear"),
            ("C", "CSV"),
            ("X", "XLS"),
            ("Esc", "Back"),
        ])
    } else {
        key_hints(&[
            ("O", "Outcome"),
            ("T", "Range"),
            ("/", "Patient"),
            ("Del", "Clear"),
            ("C", "CSV"),
            ("X", "XLS"),
            ("Esc", "Back"),
        ])
    };
    render_footer(f, chunks[4], footer);
}

fn render_filter(f: &mut Frame, area: Rect, state: &RecordsState, table: &ReferenceTable) {
    let filter = &state.filter;
    let outcome = filter.outcome.map_or_else(|| "any".to_string(), |o| o.to_string());
    let province = filter
        .province
        .as_deref()
        .and_then(|p| table.province_name(p))
        .unwrap_or("any");
    let district = match (filter.province.as_deref(), filter.district.as_deref()) {
        (Some(p), Some(d)) => table.district_name(p, d).unwrap_or("any"),
        _ => "any",
    };

    let mut spans = vec![
        Span::styled("Outcome: ", SafeCellTheme::text_secondary()),
        Span::styled(outcome, SafeCellTheme::text()),
        Span::styled("  Range: ", SafeCellTheme::text_secondary()),
        Span::styled(filter.range.label(), SafeCellTheme::text()),
        Span::styled("  Patient: ", SafeCellTheme::text_secondary()),
        Span::styled(
            if filter.patient_query.is_empty() && !state.editing_query {
                "any".to_string()
            } else {
                filter.patient_query.clone()
            },
            if state.editing_query {
                SafeCellTheme::focused()
            } else {
                SafeCellTheme::text()
            },
        ),
    ];
    if state.editing_query {
        spans.push(Span::styled("▌", SafeCellTheme::cursor()));
    }
    if state.admin {
        spans.extend([
            Span::styled("  Province: ", SafeCellTheme::text_secondary()),
            Span::styled(province, SafeCellTheme::text()),
            Span::styled("  District: ", SafeCellTheme::text_secondary()),
            Span::styled(district, SafeCellTheme::text()),
        ]);
    }

    let block = Block::default()
        .title(Span::styled(" Filter ", SafeCellTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(if filter.is_active() {
            SafeCellTheme::border_focused()
        } else {
            SafeCellTheme::border()
        });
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_table(f: &mut Frame, area: Rect, state: &RecordsState) {
    let title = format!(" Detections ({} of {}) ", state.records.len(), state.total_stored);
    let block = Block::default()
        .title(Span::styled(title, SafeCellTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(SafeCellTheme::border());

    if state.records.is_empty() {
        let message = if state.total_stored == 0 {
            "No detections stored yet"
        } else {
            "No detections match the filter"
        };
        let empty = Paragraph::new(Line::from(Span::styled(message, SafeCellTheme::text_muted())))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Date", "Result", "Conf.", "District", "Facility", "Patient"])
        .style(SafeCellTheme::header());
    let rows = state.records.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.timestamp.format("%Y-%m-%d %H:%M").to_string()),
            Cell::from(r.result.to_string()).style(SafeCellTheme::outcome(r.result)),
            Cell::from(format!("{}%", r.confidence_level)),
            Cell::from(r.location.district.name.clone()),
            Cell::from(r.location.facility_name().to_string()),
            Cell::from(r.location.patient_id.clone()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(17),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Percentage(20),
            Constraint::Percentage(35),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(SafeCellTheme::selected())
    .highlight_symbol("► ");

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn render_detail(f: &mut Frame, area: Rect, state: &RecordsState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(SafeCellTheme::border());

    let lines = match state.selected_record() {
        Some(r) => vec![
            Line::from(vec![
                Span::styled("Location: ", SafeCellTheme::text_secondary()),
                Span::styled(
                    format!(
                        "{}, {}, {}, {}",
                        r.location.facility_name(),
                        r.location.sector.name,
                        r.location.district.name,
                        r.location.province.name
                    ),
                    SafeCellTheme::text(),
                ),
            ]),
            Line::from(vec![
                Span::styled("Image: ", SafeCellTheme::text_secondary()),
                Span::styled(
                    format!(
                        "{} ({} KB, {})  analyzed in {} ms",
                        r.image_metadata.file_name,
                        r.image_metadata.file_size / 1024,
                        r.image_metadata.file_type,
                        r.processing_time_ms
                    ),
                    SafeCellTheme::text_muted(),
                ),
            ]),
        ],
        None => vec![Line::from("")],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::sample_record;
    use crate::domain::DetectionOutcome;

    #[test]
    fn test_province_cycle_wraps_to_any() {
        let table = ReferenceTable::rwanda();
        let count = table.provinces().len();
        let mut state = RecordsState::default();

        state.cycle_province(&table);
        assert_eq!(state.filter.province.as_deref(), Some(table.provinces()[0].value));
        for _ in 1..count {
            state.cycle_province(&table);
        }
        assert!(state.filter.province.is_some());
        state.cycle_province(&table);
        assert!(state.filter.province.is_none());
    }

    #[test]
    fn test_district_cycle_needs_province() {
        let table = ReferenceTable::rwanda();
        let mut state = RecordsState::default();
        state.cycle_district(&table);
        assert!(state.filter.district.is_none());

        state.cycle_province(&table);
        state.cycle_district(&table);
        let province = state.filter.province.clone().expect("Should have province");
        let first = table.districts_of(&province)[0].value;
        assert_eq!(state.filter.district.as_deref(), Some(first));

        state.cycle_province(&table);
        assert!(state.filter.district.is_none());
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut state = RecordsState::default();
        state.set_records(
            vec![
                sample_record(DetectionOutcome::Positive, 90),
                sample_record(DetectionOutcome::Negative, 70),
            ],
            2,
        );
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);

        state.set_records(vec![sample_record(DetectionOutcome::Negative, 70)], 2);
        assert_eq!(state.selected, 0);
        state.select_prev();
        assert_eq!(state.selected_record().map(|r| r.confidence_level), Some(70));
    }
}
