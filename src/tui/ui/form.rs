//! New detection form: location cascade, patient id and image path.

use std::path::PathBuf;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use super::{key_hints, render_footer, render_header};
use crate::application::LocationCascade;
use crate::domain::{Location, ValidationError};
use crate::reference::{ReferenceTable, SelectOption};
use crate::tui::styles::SafeCellTheme;

/// Form fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Province,
    District,
    Sector,
    Facility,
    PatientId,
    ImagePath,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        Self::Province,
        Self::District,
        Self::Sector,
        Self::Facility,
        Self::PatientId,
        Self::ImagePath,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Province => "Province",
            Self::District => "District",
            Self::Sector => "Sector",
            Self::Facility => "Health Facility",
            Self::PatientId => "Patient ID",
            Self::ImagePath => "Blood Smear Image",
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            Self::Province => "←/→ to choose",
            Self::District => "choose a province first",
            Self::Sector | Self::Facility => "choose a district first",
            Self::PatientId => "digits only, at least 5",
            Self::ImagePath => "path to a .jpg or .png file",
        }
    }

    fn is_select(&self) -> bool {
        matches!(
            self,
            Self::Province | Self::District | Self::Sector | Self::Facility
        )
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// Form state
pub struct DetectionFormState {
    cascade: LocationCascade,
    pub focus: FormField,
    pub image_path: String,
    pub error_message: Option<String>,
}

impl DetectionFormState {
    #[must_use]
    pub fn new(table: ReferenceTable) -> Self {
        let cascade = LocationCascade::new(table).with_listener(Box::new(
            |location: Option<&Location>| match location {
                Some(l) => tracing::debug!("Location ready: {} / {}", l.district.name, l.facility_name()),
                None => tracing::debug!("Location incomplete"),
            },
        ));

        Self {
            cascade,
            focus: FormField::Province,
            image_path: String::new(),
            error_message: None,
        }
    }

    #[must_use]
    pub fn cascade(&self) -> &LocationCascade {
        &self.cascade
    }

    pub fn next_field(&mut self) {
        let i = (self.focus.index() + 1) % FormField::ALL.len();
        self.focus = FormField::ALL[i];
    }

    pub fn prev_field(&mut self) {
        let i = self.focus.index();
        self.focus = FormField::ALL[if i == 0 { FormField::ALL.len() - 1 } else { i - 1 }];
    }

    /// Options for a select field.
    #[must_use]
    pub fn options(&self, field: FormField) -> Vec<SelectOption> {
        match field {
            FormField::Province => self.cascade.province_options(),
            FormField::District => self.cascade.district_options(),
            FormField::Sector => self.cascade.sector_options(),
            FormField::Facility => self.cascade.facility_options(),
            FormField::PatientId | FormField::ImagePath => Vec::new(),
        }
    }

    /// Selected id for a select field.
    #[must_use]
    pub fn selected(&self, field: FormField) -> Option<&str> {
        let s = self.cascade.selection();
        match field {
            FormField::Province => s.province.as_deref(),
            FormField::District => s.district.as_deref(),
            FormField::Sector => s.sector.as_deref(),
            FormField::Facility => s.facility.as_deref(),
            FormField::PatientId | FormField::ImagePath => None,
        }
    }

    fn select(&mut self, field: FormField, id: &str) {
        match field {
            FormField::Province => self.cascade.set_province(id),
            FormField::District => self.cascade.set_district(id),
            FormField::Sector => self.cascade.set_sector(id),
            FormField::Facility => self.cascade.set_facility(id),
            FormField::PatientId | FormField::ImagePath => {}
        }
    }

    /// Step the focused select field through its options.
    pub fn cycle_option(&mut self, forward: bool) {
        let field = self.focus;
        if !field.is_select() {
            return;
        }
        let options = self.options(field);
        if options.is_empty() {
            return;
        }

        let current = self
            .selected(field)
            .and_then(|id| options.iter().position(|o| o.value == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        self.select(field, options[next].value);
        self.error_message = None;
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            FormField::PatientId => {
                if c.is_ascii_digit() {
                    let mut value = self.cascade.selection().patient_id.clone();
                    value.push(c);
                    self.cascade.set_patient_id(&value);
                    self.error_message = None;
                }
            }
            FormField::ImagePath => {
                self.image_path.push(c);
                self.error_message = None;
            }
            _ => {}
        }
    }

    pub fn delete_char(&mut self) {
        match self.focus {
            FormField::PatientId => {
                let mut value = self.cascade.selection().patient_id.clone();
                value.pop();
                self.cascade.set_patient_id(&value);
            }
            FormField::ImagePath => {
                self.image_path.pop();
            }
            _ => {}
        }
    }

    /// Clear the focused field. Clearing a select also clears its dependents.
    pub fn clear_field(&mut self) {
        match self.focus {
            FormField::PatientId => self.cascade.set_patient_id(""),
            FormField::ImagePath => self.image_path.clear(),
            field => self.select(field, ""),
        }
    }

    /// Keep the location for the next sample but drop patient and image.
    pub fn clear_sample(&mut self) {
        self.cascade.set_patient_id("");
        self.image_path.zeroize();
        self.error_message = None;
        self.focus = FormField::PatientId;
    }

    /// Validate the form and return what the worker needs.
    ///
    /// # Errors
    /// Returns a message naming the first problem found.
    pub fn to_submission(&self) -> Result<(PathBuf, Location), String> {
        if let Some(e) = self.cascade.patient_id_error() {
            return Err(e.to_string());
        }
        let location = self.cascade.location().cloned().ok_or_else(|| {
            if self.cascade.selection().patient_id.is_empty() {
                ValidationError::PatientIdTooShort.to_string()
            } else {
                ValidationError::IncompleteLocation.to_string()
            }
        })?;

        let path = self.image_path.trim();
        if path.is_empty() {
            return Err("Choose a blood smear image".to_string());
        }

        Ok((PathBuf::from(path), location))
    }
}

/// Render the new detection form
pub fn render_detection_form(f: &mut Frame, area: Rect, state: &DetectionFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_header(f, chunks[0], "New Detection", "Sample Location & Image");
    render_fields(f, chunks[1], state);

    let footer = match &state.error_message {
        Some(err) => Line::from(vec![
            Span::styled("! ", SafeCellTheme::danger()),
            Span::styled(err.clone(), SafeCellTheme::danger()),
        ]),
        None => key_hints(&[
            ("↑↓", "Navigate"),
            ("←→", "Choose"),
            ("Enter", "Analyze"),
            ("Del", "Clear"),
            ("Esc", "Cancel"),
        ]),
    };
    render_footer(f, chunks[2], footer);
}

fn render_fields(f: &mut Frame, area: Rect, state: &DetectionFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let (left, right) = FormField::ALL.split_at(4);
    render_field_column(f, columns[0], left, state);
    render_field_column(f, columns[1], right, state);
}

fn render_field_column(f: &mut Frame, area: Rect, fields: &[FormField], state: &DetectionFormState) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = *field == state.focus;
        let (border_style, title_style) = if is_selected {
            (SafeCellTheme::border_focused(), SafeCellTheme::focused())
        } else {
            (SafeCellTheme::border(), SafeCellTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value = field_value(state, *field);
        let mut spans = vec![Span::raw(" ")];
        match value {
            Some(v) => spans.push(Span::styled(v, SafeCellTheme::text())),
            None => spans.push(Span::styled(field.hint(), SafeCellTheme::text_muted())),
        }
        if is_selected {
            if field.is_select() {
                let count = state.options(*field).len();
                spans.push(Span::styled(format!("  ({count} options)"), SafeCellTheme::text_muted()));
            } else {
                spans.push(Span::styled("▌", SafeCellTheme::cursor()));
            }
        }
        if *field == FormField::PatientId {
            if let Some(e) = state.cascade.patient_id_error() {
                spans.push(Span::styled(format!("  {e}"), SafeCellTheme::warning()));
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }

    // Ready indicator under the right column
    if fields.contains(&FormField::ImagePath) {
        if let Some(area) = chunks.last() {
            let status = if state.cascade.is_complete() {
                Span::styled(" Location complete", SafeCellTheme::success())
            } else {
                Span::styled(" Location incomplete", SafeCellTheme::text_muted())
            };
            f.render_widget(Paragraph::new(Line::from(status)), *area);
        }
    }
}

fn field_value(state: &DetectionFormState, field: FormField) -> Option<String> {
    match field {
        FormField::PatientId => {
            let id = &state.cascade.selection().patient_id;
            (!id.is_empty()).then(|| id.clone())
        }
        FormField::ImagePath => {
            (!state.image_path.is_empty()).then(|| state.image_path.clone())
        }
        select => {
            let id = state.selected(select)?;
            state
                .options(select)
                .into_iter()
                .find(|o| o.value == id)
                .map(|o| o.label.to_string())
        }
    }
}
