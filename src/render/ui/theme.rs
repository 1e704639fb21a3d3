//! Color theme and styling definitions using ratatui colors
//!
//! Themes are selected by name from the configuration file.

use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Color theme for terminal UI elements
#[derive(Debug, Clone)]
pub struct ColorTheme {
    /// Normal text color (None uses terminal default)
    pub normal_text: Option<Color>,

    /// Query match highlighting in titles and abstracts
    pub search_match: Style,

    /// Selected result row
    pub selection: Style,

    /// Column header above the result list
    pub header: Style,

    /// Conferences currently part of the filter
    pub active_conference: Style,

    /// Secondary text: placeholders, the loading row, counts
    pub muted: Color,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,

    /// Error/warning text
    pub error_text: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            normal_text: None,
            search_match: Style::default().fg(Color::Black).bg(Color::Yellow),
            selection: Style::default().fg(Color::White).bg(Color::Blue),
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            active_conference: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            muted: Color::DarkGray,
            status_bg: Color::Blue,
            status_fg: Color::White,
            error_text: Color::Red,
        }
    }
}

impl ColorTheme {
    /// Theme for terminals without color support
    pub fn monochrome() -> Self {
        Self {
            normal_text: None,
            search_match: Style::default().add_modifier(Modifier::REVERSED),
            selection: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            header: Style::default().add_modifier(Modifier::BOLD),
            active_conference: Style::default().add_modifier(Modifier::BOLD),
            muted: Color::Reset,
            status_bg: Color::Black,
            status_fg: Color::White,
            error_text: Color::White,
        }
    }

    /// High-contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            normal_text: Some(Color::White),
            search_match: Style::default().fg(Color::Black).bg(Color::LightYellow),
            selection: Style::default().fg(Color::Black).bg(Color::White),
            header: Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            active_conference: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            muted: Color::Gray,
            status_bg: Color::White,
            status_fg: Color::Black,
            error_text: Color::LightRed,
        }
    }

    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default(),
            ThemeName::Monochrome => Self::monochrome(),
            ThemeName::HighContrast => Self::high_contrast(),
        }
    }

    /// Base style for body text.
    pub fn text(&self) -> Style {
        match self.normal_text {
            Some(color) => Style::default().fg(color),
            None => Style::default(),
        }
    }
}
