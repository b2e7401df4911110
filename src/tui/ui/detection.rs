//! Detection progress and result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::{key_hints, render_footer, render_header};
use crate::application::SubmissionStage;
use crate::domain::DetectionRecord;
use crate::tui::styles::SafeCellTheme;

/// Detection state
#[derive(Debug, Clone, Default)]
pub enum DetectionState {
    #[default]
    Idle,
    /// Submission running
    Running { stage: SubmissionStage, progress: f64 },
    /// Classified and stored; `archived` is `None` until the upload settles
    Complete {
        record: DetectionRecord,
        archived: Option<bool>,
    },
    Error { message: String },
}

/// Render the detection view
pub fn render_detection(f: &mut Frame, area: Rect, state: &DetectionState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Detection", "Blood Smear Analysis");

    match state {
        DetectionState::Idle => render_idle(f, chunks[1]),
        DetectionState::Running { stage, progress } => {
            render_progress(f, chunks[1], *stage, *progress)
        }
        DetectionState::Complete { record, archived } => {
            render_result(f, chunks[1], record, *archived)
        }
        DetectionState::Error { message } => render_error(f, chunks[1], message),
    }

    let footer = match state {
        DetectionState::Complete { .. } => key_hints(&[
            ("Enter", "Dashboard"),
            ("N", "Next Sample"),
            ("S", "Statistics"),
        ]),
        DetectionState::Error { .. } => key_hints(&[("Enter", "Back to Form"), ("Esc", "Cancel")]),
        _ => Line::from(Span::styled("Processing...", SafeCellTheme::text_muted())),
    };
    render_footer(f, chunks[2], footer);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No detection running",
            SafeCellTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(SafeCellTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_progress(f: &mut Frame, area: Rect, stage: SubmissionStage, progress: f64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let stage_text = Paragraph::new(Line::from(vec![
        Span::styled("Stage: ", SafeCellTheme::text_secondary()),
        Span::styled(stage.label(), SafeCellTheme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(stage_text, chunks[0]);

    let ratio = progress.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(SafeCellTheme::border()),
        )
        .gauge_style(SafeCellTheme::info())
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        "The image is analyzed remotely; this can take a while on slow connections.",
        SafeCellTheme::text_muted(),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(desc, chunks[2]);
}

fn render_result(f: &mut Frame, area: Rect, record: &DetectionRecord, archived: Option<bool>) {
    let block = Block::default()
        .title(Span::styled(" Detection Result ", SafeCellTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(SafeCellTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Outcome
            Constraint::Length(3), // Confidence
            Constraint::Length(5), // Location
            Constraint::Min(0),    // Archive status
        ])
        .margin(1)
        .split(inner);

    let style = SafeCellTheme::outcome(record.result);
    let outcome = Paragraph::new(vec![
        Line::from(Span::styled(
            record.result.to_string().to_uppercase(),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            record.result.description(),
            SafeCellTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(outcome, chunks[0]);

    let confidence = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Confidence ", SafeCellTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(SafeCellTheme::border()),
        )
        .gauge_style(style)
        .percent(u16::from(record.confidence_level.min(100)))
        .label(format!("{}%", record.confidence_level));
    f.render_widget(confidence, chunks[1]);

    let location = &record.location;
    let details = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Patient: ", SafeCellTheme::text_secondary()),
            Span::styled(location.patient_id.clone(), SafeCellTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("Facility: ", SafeCellTheme::text_secondary()),
            Span::styled(location.facility_name().to_string(), SafeCellTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("Area: ", SafeCellTheme::text_secondary()),
            Span::styled(
                format!(
                    "{}, {}, {}",
                    location.sector.name, location.district.name, location.province.name
                ),
                SafeCellTheme::text(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Analyzed in ", SafeCellTheme::text_secondary()),
            Span::styled(format!("{} ms", record.processing_time_ms), SafeCellTheme::text()),
        ]),
    ]);
    f.render_widget(details, chunks[2]);

    let status = match archived {
        None => Span::styled("Uploading to archive...", SafeCellTheme::text_muted()),
        Some(true) => Span::styled("Saved and archived", SafeCellTheme::success()),
        Some(false) => Span::styled(
            "Saved on this device; archive upload failed",
            SafeCellTheme::warning(),
        ),
    };
    f.render_widget(Paragraph::new(Line::from(status)), chunks[3]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Detection failed", SafeCellTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, SafeCellTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(SafeCellTheme::danger()),
    );

    f.render_widget(content, area);
}
