// Status bar component
//
// Bottom line: load state, post count, active view, API host, the focused
// component's key hints, and the latest log message on wide terminals.

use crate::logging::LogLevel;
use crate::tui::app::{App, ListState};
use crate::tui::portal::Breakpoint;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let bp = Breakpoint::from_width(area.width);

    let state = match &app.list {
        ListState::Loading => "loading…".to_string(),
        ListState::Failed(_) => "✗ failed".to_string(),
        ListState::Loaded => format!("{} posts", app.cards.len()),
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::raw(state),
        Span::raw(" │ "),
        Span::raw(app.view.name()),
    ];

    if bp != Breakpoint::Compact {
        spans.push(Span::raw(" │ "));
        spans.push(Span::raw(app.source_name.as_str()));
    }

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(app.focus_hint(), Style::default().fg(theme.muted)));

    if bp == Breakpoint::Wide {
        if let Some(entry) = app.log_buffer.latest() {
            let color = match entry.level {
                LogLevel::Error => theme.error,
                LogLevel::Warn => theme.accent,
                _ => theme.muted,
            };
            spans.push(Span::raw(" │ "));
            spans.push(Span::styled(entry.message, Style::default().fg(color)));
        }
    }

    let status = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(theme.status_bar))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border)),
        );

    f.render_widget(status, area);
}
