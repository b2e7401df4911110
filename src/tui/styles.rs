//! Color palette and preset styles.
//!
//! High-contrast on dark backgrounds so screens stay readable on the
//! low-end laptops used at health centres.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::DetectionOutcome;

/// SafeCell color palette.
pub struct SafeCellTheme;

impl SafeCellTheme {
    /// Deep red, the primary brand color
    pub const PRIMARY: Color = Color::Rgb(185, 28, 28); // #B91C1C

    pub const PRIMARY_LIGHT: Color = Color::Rgb(248, 113, 113); // #F87171

    pub const PRIMARY_DARK: Color = Color::Rgb(127, 29, 29); // #7F1D1D

    /// Slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    // === Backgrounds ===

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    // === Text ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Highlighted row or option
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Table header row
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for a detection outcome
    #[must_use]
    pub fn outcome(outcome: DetectionOutcome) -> Style {
        match outcome {
            DetectionOutcome::Positive => Self::danger(),
            DetectionOutcome::Negative => Self::success(),
        }
    }

    /// Style for a positive rate given as a percentage.
    #[must_use]
    pub fn positive_rate(rate: f64) -> Style {
        if rate >= 30.0 {
            Self::danger()
        } else if rate >= 10.0 {
            Self::warning()
        } else {
            Self::success()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_thresholds() {
        assert_eq!(SafeCellTheme::positive_rate(4.0), SafeCellTheme::success());
        assert_eq!(SafeCellTheme::positive_rate(10.0), SafeCellTheme::warning());
        assert_eq!(SafeCellTheme::positive_rate(45.5), SafeCellTheme::danger());
    }
}
