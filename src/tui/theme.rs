// Theme system for the TUI
//
// A handful of built-in palettes, switchable at runtime with `t`.
// Every widget styles itself from the resolved `Theme`, never from raw colors.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
    Nord,
}

impl ThemeKind {
    pub fn all() -> &'static [ThemeKind] {
        &[ThemeKind::Dark, ThemeKind::Light, ThemeKind::Nord]
    }

    /// Next theme in the cycle
    pub fn next(self) -> Self {
        let themes = Self::all();
        let current = themes.iter().position(|&t| t == self).unwrap_or(0);
        themes[(current + 1) % themes.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
            ThemeKind::Nord => "nord",
        }
    }

    /// Parse a config value; unknown names fall back to the default
    pub fn from_name(name: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
            ThemeKind::Nord => Theme::nord(),
        }
    }
}

/// Resolved colors for every UI element
#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,

    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    pub border: Color,
    pub highlight: Color,
    pub border_type: BorderType,

    /// Headings and the primary call-to-action
    pub accent: Color,
    pub title: Color,
    pub error: Color,
    pub skeleton: Color,
    pub status_bar: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            background: Color::Rgb(15, 17, 26),
            foreground: Color::Rgb(220, 223, 228),
            muted: Color::Rgb(128, 134, 150),
            border: Color::Rgb(60, 66, 82),
            highlight: Color::Rgb(130, 170, 255),
            border_type: BorderType::Rounded,
            accent: Color::Rgb(199, 146, 234),
            title: Color::Rgb(130, 170, 255),
            error: Color::Rgb(255, 99, 99),
            skeleton: Color::Rgb(45, 50, 64),
            status_bar: Color::Rgb(150, 156, 170),
        }
    }

    pub fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            background: Color::Rgb(250, 250, 250),
            foreground: Color::Rgb(36, 41, 47),
            muted: Color::Rgb(110, 119, 129),
            border: Color::Rgb(208, 215, 222),
            highlight: Color::Rgb(9, 105, 218),
            border_type: BorderType::Rounded,
            accent: Color::Rgb(130, 80, 223),
            title: Color::Rgb(9, 105, 218),
            error: Color::Rgb(207, 34, 46),
            skeleton: Color::Rgb(230, 232, 235),
            status_bar: Color::Rgb(87, 96, 106),
        }
    }

    pub fn nord() -> Self {
        Self {
            kind: ThemeKind::Nord,
            background: Color::Rgb(46, 52, 64),
            foreground: Color::Rgb(216, 222, 233),
            muted: Color::Rgb(129, 161, 193),
            border: Color::Rgb(76, 86, 106),
            highlight: Color::Rgb(136, 192, 208),
            border_type: BorderType::Plain,
            accent: Color::Rgb(180, 142, 173),
            title: Color::Rgb(143, 188, 187),
            error: Color::Rgb(191, 97, 106),
            skeleton: Color::Rgb(59, 66, 82),
            status_bar: Color::Rgb(229, 233, 240),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        ThemeKind::default().theme()
    }
}
