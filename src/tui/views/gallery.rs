// Gallery view: posts as a grid of cards that expand into an overlay

use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let App {
        grid, theme, morph, ..
    } = app;
    let theme: &_ = theme;

    if grid.cards().is_empty() {
        return;
    }

    let [caption, cells] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);
    f.render_widget(
        Paragraph::new(format!("{} posts · Enter or click to expand", grid.cards().len()))
            .style(Style::default().fg(theme.muted)),
        caption,
    );

    grid.render(f, cells, theme, morph);
}
