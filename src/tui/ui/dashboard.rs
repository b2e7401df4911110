//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::render_header;
use crate::domain::{LogEntry, LogLevel, SessionUser};
use crate::tui::styles::SafeCellTheme;

/// Feedback being typed on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct FeedbackDraft {
    pub rating: Option<u8>,
    pub message: String,
}

impl FeedbackDraft {
    /// Digits 1-5 set the rating while no message has been typed.
    pub fn input_char(&mut self, c: char) {
        match c.to_digit(10) {
            Some(d @ 1..=5) if self.message.is_empty() => self.rating = Some(d as u8),
            _ if self.rating.is_some() => self.message.push(c),
            _ => {}
        }
    }

    pub fn delete_char(&mut self) {
        if self.message.pop().is_none() {
            self.rating = None;
        }
    }
}

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub user: Option<SessionUser>,
    pub stored_detections: usize,
    pub positive_detections: usize,
    pub recent_logs: Vec<LogEntry>,
    pub prediction_url: String,
    pub feedback: Option<FeedbackDraft>,
    /// One-line status shown under the actions
    pub notice: Option<String>,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0], "SafeCell", "Malaria Blood Smear Screening");

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_status_panels(f, columns[0], state);
    render_activity(f, columns[1], state);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Session
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let session = match &state.user {
        Some(user) => vec![
            Line::from(vec![
                Span::styled("  User: ", SafeCellTheme::text_secondary()),
                Span::styled(user.name.clone(), SafeCellTheme::text()),
            ]),
            Line::from(vec![
                Span::styled("  Role: ", SafeCellTheme::text_secondary()),
                Span::styled(user.role.to_string(), SafeCellTheme::info()),
            ]),
            Line::from(vec![
                Span::styled("  Stored: ", SafeCellTheme::text_secondary()),
                Span::styled(state.stored_detections.to_string(), SafeCellTheme::text()),
                Span::styled("  Positive: ", SafeCellTheme::text_secondary()),
                Span::styled(state.positive_detections.to_string(), SafeCellTheme::danger()),
            ]),
            Line::from(vec![
                Span::styled("  Model: ", SafeCellTheme::text_secondary()),
                Span::styled(state.prediction_url.clone(), SafeCellTheme::text_muted()),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "  Not signed in",
            SafeCellTheme::warning(),
        ))],
    };

    let session_block = Block::default()
        .title(Span::styled(" Session ", SafeCellTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(SafeCellTheme::border());
    f.render_widget(Paragraph::new(session).block(session_block), chunks[0]);

    let mut actions = vec![
        action_line("N", "New Detection"),
        action_line("S", "Statistics"),
        action_line("R", "Records"),
        action_line("F", "Leave Feedback"),
        action_line(
            "L",
            if state.user.is_some() { "Sign Out" } else { "Sign In" },
        ),
        action_line("Q", "Quit"),
    ];

    match &state.feedback {
        Some(draft) => {
            actions.push(Line::from(""));
            actions.push(Line::from(vec![
                Span::styled("Rating: ", SafeCellTheme::text_secondary()),
                Span::styled(
                    draft.rating.map_or_else(|| "press 1-5".to_string(), |r| format!("{r}/5")),
                    SafeCellTheme::focused(),
                ),
            ]));
            actions.push(Line::from(vec![
                Span::styled("Message: ", SafeCellTheme::text_secondary()),
                Span::styled(draft.message.clone(), SafeCellTheme::text()),
                Span::styled("▌", SafeCellTheme::cursor()),
            ]));
            actions.push(Line::from(Span::styled(
                "[Enter] send  [Esc] cancel",
                SafeCellTheme::text_muted(),
            )));
        }
        None => {
            if let Some(notice) = &state.notice {
                actions.push(Line::from(""));
                actions.push(Line::from(Span::styled(notice.clone(), SafeCellTheme::info())));
            }
        }
    }

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", SafeCellTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(SafeCellTheme::border());
    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn action_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("[{key}] "), SafeCellTheme::key_hint()),
        Span::styled(desc.to_string(), SafeCellTheme::key_desc()),
    ])
}

fn level_style(level: LogLevel) -> ratatui::style::Style {
    match level {
        LogLevel::Info => SafeCellTheme::text_secondary(),
        LogLevel::Warning => SafeCellTheme::warning(),
        LogLevel::Error => SafeCellTheme::danger(),
    }
}

fn render_activity(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(Span::styled(" Recent Activity ", SafeCellTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(SafeCellTheme::border());

    if state.recent_logs.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No activity yet. Press [N] to screen a sample.",
            SafeCellTheme::text_muted(),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = state
        .recent_logs
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    entry.timestamp.format("%m-%d %H:%M ").to_string(),
                    SafeCellTheme::text_muted(),
                ),
                Span::styled(format!("{:<20}", entry.action), level_style(entry.level)),
                Span::styled(entry.details.clone(), SafeCellTheme::text()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_draft_input() {
        let mut draft = FeedbackDraft::default();
        draft.input_char('x');
        assert!(draft.rating.is_none());
        assert!(draft.message.is_empty());

        draft.input_char('4');
        assert_eq!(draft.rating, Some(4));
        for c in "ok 5".chars() {
            draft.input_char(c);
        }
        assert_eq!(draft.rating, Some(4));
        assert_eq!(draft.message, "ok 5");

        for _ in 0..4 {
            draft.delete_char();
        }
        assert!(draft.message.is_empty());
        draft.delete_char();
        assert!(draft.rating.is_none());
    }
}
