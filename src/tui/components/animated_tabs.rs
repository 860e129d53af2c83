//! Tab bar with one animated content pane
//!
//! Switching tabs moves the highlight under the labels and swaps the pane in
//! "wait" mode: the old pane fades and slides out to the right, then the new
//! one fades and slides in from the left. An empty tab list renders nothing.

use crate::tui::popover::{lerp_rect, Easing, Phase, Transition};
use crate::tui::theme::Theme;
use crate::tui::traits::{Handled, Interactive};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::cell::RefCell;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const PANE_DURATION: Duration = Duration::from_millis(400);
const INDICATOR_DURATION: Duration = Duration::from_millis(500);

/// Columns the pane slides over while entering or exiting
const SLIDE: f32 = 3.0;

/// Height of the tab bar, borders included
pub const BAR_HEIGHT: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: String,
    pub label: String,
}

impl Tab {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

pub struct AnimatedTabs {
    tabs: Vec<Tab>,
    active: usize,
    /// Pane currently on screen; lags `active` while the old pane exits
    shown: usize,
    pane: Transition,
    indicator: Transition,
    indicator_from: usize,
    label_areas: RefCell<Vec<Rect>>,
}

impl AnimatedTabs {
    /// `default_tab` selects by id; unknown or missing means the first tab
    pub fn new(tabs: Vec<Tab>, default_tab: Option<&str>) -> Self {
        let active = default_tab
            .and_then(|id| tabs.iter().position(|t| t.id == id))
            .unwrap_or(0);

        let mut pane = Transition::new(PANE_DURATION).with_easing(Easing::EaseOut);
        pane.show();
        let mut indicator = Transition::new(INDICATOR_DURATION);
        indicator.finish_shown();

        Self {
            tabs,
            active,
            shown: active,
            pane,
            indicator,
            indicator_from: active,
            label_areas: RefCell::new(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_id(&self) -> Option<&str> {
        self.tabs.get(self.active).map(|t| t.id.as_str())
    }

    /// Index of the pane being drawn (the outgoing one during a switch)
    #[allow(dead_code)] // Inspected by tests
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn select(&mut self, index: usize) {
        if index >= self.tabs.len() || index == self.active {
            return;
        }
        tracing::debug!("Tab {} -> {}", self.tabs[self.active].id, self.tabs[index].id);

        self.indicator_from = self.active;
        self.indicator = Transition::new(INDICATOR_DURATION);
        self.indicator.show();
        self.active = index;

        // Wait mode: exit first, the new pane enters once hidden
        self.pane.hide();
        self.settle();
    }

    pub fn select_next(&mut self) {
        if !self.tabs.is_empty() {
            self.select((self.active + 1) % self.tabs.len());
        }
    }

    pub fn select_prev(&mut self) {
        if !self.tabs.is_empty() {
            self.select((self.active + self.tabs.len() - 1) % self.tabs.len());
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.pane.advance(dt);
        self.indicator.advance(dt);
        self.settle();
    }

    fn settle(&mut self) {
        if self.pane.phase() == Phase::Hidden && self.shown != self.active {
            self.shown = self.active;
            self.pane.show();
        }
    }

    pub fn is_animating(&self) -> bool {
        self.pane.is_animating() || self.indicator.is_animating() || self.shown != self.active
    }

    /// Pane opacity in [0, 1]
    pub fn pane_opacity(&self) -> f32 {
        self.pane.progress()
    }

    /// Horizontal pane offset: negative while entering, positive while exiting
    pub fn pane_offset(&self) -> i16 {
        let remaining = (1.0 - self.pane.progress()) * SLIDE;
        match self.pane.phase() {
            Phase::Entering => -(remaining.round() as i16),
            Phase::Exiting => remaining.round() as i16,
            Phase::Hidden | Phase::Shown => 0,
        }
    }

    /// Label under a pointer position, if any
    pub fn tab_at(&self, column: u16, row: u16) -> Option<usize> {
        self.label_areas.borrow().iter().position(|area| {
            column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
        })
    }

    /// Draw the bar and hand the pane area to `pane`
    ///
    /// `pane` receives the shown tab's index and its opacity.
    pub fn render(
        &self,
        f: &mut Frame,
        area: Rect,
        theme: &Theme,
        pane: impl FnOnce(&mut Frame, Rect, usize, f32),
    ) {
        if self.tabs.is_empty() {
            self.label_areas.borrow_mut().clear();
            return;
        }

        let [bar, body] =
            Layout::vertical([Constraint::Length(BAR_HEIGHT), Constraint::Min(0)]).areas(area);

        self.render_bar(f, bar, theme);

        let body_block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border));
        let inner = body_block.inner(body);
        f.render_widget(body_block, body);

        if self.pane.is_visible() {
            pane(f, shift(inner, self.pane_offset()), self.shown, self.pane_opacity());
        }
    }

    fn render_bar(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut areas = Vec::with_capacity(self.tabs.len());
        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        let mut x = inner.x;
        for (i, tab) in self.tabs.iter().enumerate() {
            let label = format!(" {} ", tab.label);
            let width = (label.width() as u16).min(inner.right().saturating_sub(x));
            areas.push(Rect::new(x, inner.y, width, 1));
            x = x.saturating_add(width + 1);

            let style = if i == self.active {
                Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), inner);

        // Highlight slides from the previous tab to the active one
        if let (Some(&from), Some(&to)) = (areas.get(self.indicator_from), areas.get(self.active)) {
            let marker = lerp_rect(from, to, self.indicator.progress());
            let buffer = f.buffer_mut();
            for col in marker.left()..marker.right() {
                if let Some(cell) = buffer.cell_mut((col, marker.y)) {
                    let style = cell.style().bg(theme.skeleton);
                    cell.set_style(style);
                }
            }
        }

        *self.label_areas.borrow_mut() = areas;
    }
}

impl Interactive for AnimatedTabs {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.select_next(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => self.select_prev(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index >= self.tabs.len() {
                    return Handled::No;
                }
                self.select(index);
            }
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("←→:tabs  1-9:jump  Enter:read more")
    }
}

/// Move `area` sideways, shrinking instead of leaving its parent
fn shift(area: Rect, dx: i16) -> Rect {
    let magnitude = dx.unsigned_abs().min(area.width);
    if dx >= 0 {
        Rect::new(area.x + magnitude, area.y, area.width - magnitude, area.height)
    } else {
        Rect::new(area.x, area.y, area.width - magnitude, area.height)
    }
}
