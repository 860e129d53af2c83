// Views module - screen-level rendering logic
//
// - Home: the tabbed post view, plus its loading and error states
// - Gallery: the same posts as an expandable card grid
// - Help: key bindings, in an overlay
//
// Page content is drawn first; overlays are drawn last, against the whole
// frame, so they cover the header and status bar too.

mod gallery;
mod help;
mod home;

use super::app::{App, ListState, View};
use crate::tui::components::{header, status_bar};
use ratatui::layout::{Constraint, Layout, Margin};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Rows taken by the status bar (top border + text)
const STATUS_HEIGHT: u16 = 2;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(
        Style::default()
            .bg(app.theme.background)
            .fg(app.theme.foreground),
    );
    f.render_widget(bg_block, f.area());

    let [header_area, content, status] = Layout::vertical([
        Constraint::Length(header::HEIGHT),
        Constraint::Min(0),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(f.area());

    header::render(f, header_area, &app.theme);

    let content = content.inner(Margin::new(2, 0));
    match &app.list {
        ListState::Loading => home::render_loading(f, content, &app.theme, app.pulse()),
        ListState::Failed(_) => home::render_error(f, content, &app.theme),
        ListState::Loaded => match app.view {
            View::Tabs => home::render(f, content, app),
            View::Gallery => gallery::render(f, content, app),
        },
    }

    status_bar::render(f, status, app);

    // Portal layer
    let pulse = app.pulse();
    let App {
        grid,
        cards,
        help,
        theme,
        morph,
        source_name,
        ..
    } = app;
    let theme: &_ = theme;
    grid.render_overlay(f, theme, morph);
    for card in cards.iter_mut() {
        card.render_overlay(f, theme, morph, pulse);
    }
    help::render(f, help, theme, morph, source_name);

    if let Some(toast) = &app.toast {
        let frame = f.area();
        toast.render(f, frame, &app.theme);
    }
}
