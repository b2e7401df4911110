//! UI module: View components for the TUI.

pub mod dashboard;
pub mod detection;
pub mod form;
pub mod records;
pub mod statistics;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::SafeCellTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Results are a screening aid and must be confirmed by microscopy or RDT.",
            SafeCellTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Do not start or withhold treatment on this result alone.",
            SafeCellTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(SafeCellTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Screen title bar.
pub(crate) fn render_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", SafeCellTheme::text()),
        Span::styled(title.to_string(), SafeCellTheme::title()),
        Span::styled(" │ ", SafeCellTheme::text_muted()),
        Span::styled(subtitle.to_string(), SafeCellTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(SafeCellTheme::border()),
    );

    f.render_widget(header, area);
}

/// Footer line of `[key] description` pairs.
pub(crate) fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let spans: Vec<Span<'static>> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), SafeCellTheme::key_hint()),
                Span::styled(format!("{desc} "), SafeCellTheme::key_desc()),
            ]
        })
        .collect();
    Line::from(spans)
}

pub(crate) fn render_footer(f: &mut Frame, area: Rect, content: Line<'_>) {
    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(SafeCellTheme::border()),
    );

    f.render_widget(footer, area);
}
