// Home view: one tab per post, the active post's card in the pane

use crate::tui::app::App;
use crate::tui::components::skeleton;
use crate::tui::portal;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::Paragraph,
    Frame,
};

const LIST_FAILED: &str = "Failed to load blogs. Please try again later.";

/// Placeholder tab labels while the list loads
const TAB_BONES: u16 = 3;
const TAB_BONE_WIDTH: u16 = 10;

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let App {
        tabs,
        cards,
        theme,
        morph,
        ..
    } = app;
    let theme: &Theme = theme;

    tabs.render(f, area, theme, |f, pane, index, opacity| {
        if let Some(card) = cards.get(index) {
            card.render(f, pane, theme, opacity, morph);
        }
    });
}

/// Three tab placeholders over a pane placeholder
pub fn render_loading(f: &mut Frame, area: Rect, theme: &Theme, pulse: f32) {
    if area.height < 3 {
        return;
    }

    for i in 0..TAB_BONES {
        let x = area.x + 1 + i * (TAB_BONE_WIDTH + 2);
        if x + TAB_BONE_WIDTH > area.right() {
            break;
        }
        skeleton::render_bone(f, Rect::new(x, area.y + 1, TAB_BONE_WIDTH, 1), theme, pulse);
    }

    let pane = Rect::new(area.x, area.y + 3, area.width, area.height - 3);
    skeleton::render_bone(f, pane, theme, pulse);
}

pub fn render_error(f: &mut Frame, area: Rect, theme: &Theme) {
    let line = portal::centered(area.width, 1, area);
    f.render_widget(
        Paragraph::new(LIST_FAILED)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
        line,
    );
}
