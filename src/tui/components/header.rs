// Page header: title and subtitle, centred

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub const TITLE: &str = "Latest Insights";
pub const SUBTITLE: &str =
    "Explore cutting-edge articles on AI, machine learning, and technology innovation.";

/// Rows the header needs, including the gap below it
pub const HEIGHT: u16 = 4;

pub fn render(f: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(theme.muted))),
    ];

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
