//! Card grid whose cards expand into a shared overlay
//!
//! One popover serves the whole grid. Selecting a card opens it; selecting
//! another while one is open replaces the selection in place, so there is
//! never more than one expanded card. `last_selected` remembers the card that
//! just closed so its exit animation still has something to draw.

use crate::tui::popover::{
    ControlledOpen, Document, MorphRegistry, OverlayPresenter, PopoverConfig, PopoverHandle,
};
use crate::tui::portal::Breakpoint;
use crate::tui::scroll::ScrollState;
use crate::tui::theme::Theme;
use crate::tui::traits::{Handled, Interactive, Scrollable};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::cell::RefCell;
use std::time::Duration;

const CELL_HEIGHT: u16 = 8;
const GAP: u16 = 1;

#[derive(Debug, Clone)]
pub struct Card {
    pub id: u32,
    pub content: Text<'static>,
    pub thumbnail_url: String,
    /// Width hint; `col-span-2` (with any responsive prefix) spans both columns
    pub layout_class: String,
}

impl Card {
    pub fn span(&self) -> u16 {
        let wide = self
            .layout_class
            .split_whitespace()
            .any(|class| class.rsplit(':').next() == Some("col-span-2"));
        if wide {
            2
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridSelection {
    pub selected: Option<u32>,
    /// Previous selection, kept for exit continuity only
    pub last_selected: Option<u32>,
}

pub struct LayoutGrid {
    cards: Vec<Card>,
    selection: GridSelection,
    popover: PopoverHandle,
    presenter: OverlayPresenter,
    cursor: usize,
    scroll: ScrollState,
    cell_areas: RefCell<Vec<(u32, Rect)>>,
}

impl LayoutGrid {
    pub fn new(cards: Vec<Card>, document: &Document) -> Self {
        let is_open = ControlledOpen::new(false);
        let sink = is_open.clone();
        let popover =
            PopoverHandle::new(PopoverConfig::controlled(is_open).on_open_change(move |open| sink.set(open)));

        Self {
            cards,
            selection: GridSelection::default(),
            presenter: OverlayPresenter::new(popover.clone(), document.clone()),
            popover,
            cursor: 0,
            scroll: ScrollState::new(),
            cell_areas: RefCell::new(Vec::new()),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn selection(&self) -> GridSelection {
        self.selection
    }

    pub fn is_open(&self) -> bool {
        self.popover.is_open()
    }

    pub fn presenter(&self) -> &OverlayPresenter {
        &self.presenter
    }

    fn card(&self, id: u32) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Expand a card, replacing any current selection
    pub fn select(&mut self, id: u32) {
        let Some(index) = self.cards.iter().position(|c| c.id == id) else {
            return;
        };

        self.selection.last_selected = self.selection.selected;
        self.selection.selected = Some(id);
        self.cursor = index;
        self.scroll.reset();

        self.popover.open();
        self.presenter.sync();
    }

    /// Close the overlay (backdrop, `[x]`)
    pub fn dismiss(&mut self) {
        self.popover.close();
        self.sync();
    }

    /// Follow the popover after listeners may have closed it
    pub fn sync(&mut self) {
        self.presenter.sync();
        if !self.popover.is_open() && self.selection.selected.is_some() {
            self.selection.last_selected = self.selection.selected.take();
        }
    }

    /// Swap in a new card collection, dropping selections whose card is gone
    pub fn reconcile(&mut self, cards: Vec<Card>) {
        self.cards = cards;

        if let Some(id) = self.selection.selected {
            if self.card(id).is_none() {
                tracing::debug!("Selected card {} disappeared, closing", id);
                self.selection.selected = None;
                self.popover.close();
                self.presenter.sync();
            }
        }
        if let Some(id) = self.selection.last_selected {
            if self.card(id).is_none() {
                self.selection.last_selected = None;
            }
        }
        self.cursor = self.cursor.min(self.cards.len().saturating_sub(1));
    }

    pub fn advance(&mut self, dt: Duration) {
        self.presenter.advance(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.presenter.is_animating()
    }

    /// Card drawn in the overlay: the selection, or the one animating out
    fn overlay_card(&self) -> Option<&Card> {
        self.selection
            .selected
            .or(self.selection.last_selected)
            .and_then(|id| self.card(id))
    }

    pub fn card_at(&self, column: u16, row: u16) -> Option<u32> {
        self.cell_areas
            .borrow()
            .iter()
            .find(|(_, a)| column >= a.x && column < a.right() && row >= a.y && row < a.bottom())
            .map(|(id, _)| *id)
    }

    /// Click inside the open overlay; returns true if it closed
    pub fn click_overlay(&mut self, column: u16, row: u16) -> bool {
        if self.presenter.hits_close_button(column, row) {
            self.dismiss();
            return true;
        }
        false
    }

    fn columns(width: u16) -> u16 {
        if Breakpoint::from_width(width) == Breakpoint::Compact {
            1
        } else {
            2
        }
    }

    /// Place cards row by row; wide cards take a row of their own
    fn layout(&self, area: Rect) -> Vec<(usize, Rect)> {
        let columns = Self::columns(area.width);
        let column_width = area.width.saturating_sub(GAP * (columns - 1)) / columns;

        let mut placed = Vec::with_capacity(self.cards.len());
        let (mut col, mut row) = (0u16, 0u16);
        for (i, card) in self.cards.iter().enumerate() {
            let span = card.span().min(columns);
            if col + span > columns {
                col = 0;
                row += 1;
            }
            let width = column_width * span + GAP * (span - 1);
            let x = area.x + col * (column_width + GAP);
            let y = row * (CELL_HEIGHT + GAP);
            placed.push((i, Rect::new(x, y, width, CELL_HEIGHT)));

            col += span;
            if col >= columns {
                col = 0;
                row += 1;
            }
        }
        placed
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, morph: &mut MorphRegistry) {
        let placed = self.layout(area);

        // Keep the cursor's row on screen
        let cursor_bottom = placed
            .get(self.cursor)
            .map_or(0, |(_, r)| r.bottom());
        let offset = cursor_bottom.saturating_sub(area.height);

        let mut areas = Vec::with_capacity(placed.len());
        for (i, rect) in placed {
            let card = &self.cards[i];
            let Some(y) = rect.y.checked_sub(offset) else {
                continue;
            };
            if y >= area.height {
                continue;
            }
            let rect = Rect::new(rect.x, area.y + y, rect.width, rect.height.min(area.height - y));

            let lifted = self.selection.selected == Some(card.id)
                || (self.presenter.is_mounted() && self.overlay_card().map(|c| c.id) == Some(card.id));
            if lifted {
                morph.record(self.popover.instance_id(), rect);
            }
            render_cell(f, rect, card, theme, i == self.cursor, lifted);
            areas.push((card.id, rect));
        }
        *self.cell_areas.borrow_mut() = areas;
    }

    pub fn render_overlay(&mut self, f: &mut Frame, theme: &Theme, morph: &MorphRegistry) {
        let Some(card) = self.overlay_card().cloned() else {
            return;
        };
        let scroll = &mut self.scroll;

        self.presenter.render(f, morph, theme, "", |f, area| {
            let mut lines = card.content.lines.clone();
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!("▣ {}", card.thumbnail_url),
                Style::default().fg(theme.muted),
            )));

            let height = lines.len();
            scroll.update_dimensions(height, area.height as usize);
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .scroll((scroll.offset() as u16, 0)),
                area,
            );
        });
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.cards.is_empty() {
            return;
        }
        let len = self.cards.len() as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
    }

    fn neighbour(&mut self, delta: isize) {
        self.move_cursor(delta);
        if let Some(card) = self.cards.get(self.cursor) {
            let id = card.id;
            self.select(id);
        }
    }
}

impl Scrollable for LayoutGrid {
    fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    fn scroll_state_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }
}

impl Interactive for LayoutGrid {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if self.is_open() {
            match key.code {
                KeyCode::Left | KeyCode::Char('h') => self.neighbour(-1),
                KeyCode::Right | KeyCode::Char('l') => self.neighbour(1),
                KeyCode::Char('x') => self.dismiss(),
                _ => return self.handle_scroll_keys(key),
            }
            return Handled::Yes;
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-2),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(2),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.cards.get(self.cursor).map(|c| c.id) {
                    self.select(id);
                }
            }
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        if self.is_open() {
            Some("←→:next card  ↑↓:scroll  x/Esc:close")
        } else {
            Some("arrows:move  Enter:expand")
        }
    }
}

fn render_cell(f: &mut Frame, area: Rect, card: &Card, theme: &Theme, focused: bool, lifted: bool) {
    let border = if focused { theme.highlight } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(border));

    // The expanded copy lives in the overlay; leave the slot empty
    if lifted {
        f.render_widget(block.border_style(Style::default().fg(theme.skeleton)), area);
        return;
    }

    let mut lines = card.content.lines.clone();
    lines.push(Line::from(Span::styled(
        card.thumbnail_url.clone(),
        Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
    )));
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::popover::DocumentEvent;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn card(id: u32, class: &str) -> Card {
        Card {
            id,
            content: Text::raw(format!("Card {}", id)),
            thumbnail_url: format!("https://images.example/{}.jpg", id),
            layout_class: class.to_string(),
        }
    }

    fn grid(document: &Document) -> LayoutGrid {
        LayoutGrid::new(
            vec![card(1, "md:col-span-2"), card(2, "col-span-1"), card(3, ""), card(4, "")],
            document,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn span_parses_responsive_prefix() {
        assert_eq!(card(1, "md:col-span-2").span(), 2);
        assert_eq!(card(1, "col-span-2 h-80").span(), 2);
        assert_eq!(card(1, "col-span-1").span(), 1);
        assert_eq!(card(1, "").span(), 1);
    }

    #[test]
    fn selecting_another_card_replaces_selection() {
        let document = Document::new();
        let mut g = grid(&document);

        g.select(1);
        g.select(2);
        assert_eq!(
            g.selection(),
            GridSelection {
                selected: Some(2),
                last_selected: Some(1),
            }
        );
        assert!(g.is_open());
        assert_eq!(document.listener_count(), 2, "one overlay, one listener pair");
    }

    #[test]
    fn dismiss_moves_selection_to_last() {
        let document = Document::new();
        let mut g = grid(&document);

        g.select(3);
        g.dismiss();
        assert_eq!(g.selection().selected, None);
        assert_eq!(g.selection().last_selected, Some(3));
        assert!(!g.is_open());
        assert_eq!(document.listener_count(), 0);
    }

    #[test]
    fn escape_dismisses_after_sync() {
        let document = Document::new();
        let mut g = grid(&document);
        g.select(1);

        document.dispatch(&DocumentEvent::KeyDown(KeyCode::Esc));
        g.sync();
        assert_eq!(g.selection().selected, None);
        assert_eq!(g.selection().last_selected, Some(1));
    }

    #[test]
    fn unknown_card_is_ignored() {
        let document = Document::new();
        let mut g = grid(&document);
        g.select(99);
        assert_eq!(g.selection(), GridSelection::default());
        assert!(!g.is_open());
    }

    #[test]
    fn reconcile_clears_vanished_cards() {
        let document = Document::new();
        let mut g = grid(&document);
        g.select(1);
        g.select(2);

        g.reconcile(vec![card(3, ""), card(4, "")]);
        assert_eq!(g.selection(), GridSelection::default());
        assert!(!g.is_open());
        assert_eq!(document.listener_count(), 0);
    }

    #[test]
    fn reconcile_keeps_surviving_selection() {
        let document = Document::new();
        let mut g = grid(&document);
        g.select(1);
        g.select(2);

        g.reconcile(vec![card(2, ""), card(5, "")]);
        assert_eq!(g.selection().selected, Some(2));
        assert_eq!(g.selection().last_selected, None);
        assert!(g.is_open());
    }

    #[test]
    fn keys_navigate_and_replace() {
        let document = Document::new();
        let mut g = grid(&document);

        g.handle_key(key(KeyCode::Right));
        assert_eq!(g.handle_key(key(KeyCode::Enter)), Handled::Yes);
        assert_eq!(g.selection().selected, Some(2));

        // While open, arrows move the expansion to the neighbour
        g.handle_key(key(KeyCode::Right));
        assert_eq!(g.selection().selected, Some(3));
        assert_eq!(g.selection().last_selected, Some(2));

        g.handle_key(key(KeyCode::Char('x')));
        assert!(!g.is_open());
        assert_eq!(g.handle_key(key(KeyCode::Char('z'))), Handled::No);
    }

    #[test]
    fn layout_puts_wide_card_on_its_own_row() {
        let document = Document::new();
        let g = grid(&document);
        let placed = g.layout(Rect::new(0, 0, 101, 40));

        assert_eq!(placed[0].1, Rect::new(0, 0, 101, CELL_HEIGHT));
        assert_eq!(placed[1].1, Rect::new(0, CELL_HEIGHT + GAP, 50, CELL_HEIGHT));
        assert_eq!(placed[2].1, Rect::new(51, CELL_HEIGHT + GAP, 50, CELL_HEIGHT));
        assert_eq!(placed[3].1.y, 2 * (CELL_HEIGHT + GAP));
    }

    #[test]
    fn selected_card_is_not_drawn_twice() {
        let document = Document::new();
        let mut g = grid(&document);
        let mut morph = MorphRegistry::new();
        g.select(2);
        g.advance(Duration::from_secs(1));

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                g.render(f, area, &Theme::default(), &mut morph);
                g.render_overlay(f, &Theme::default(), &morph);
            })
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert_eq!(screen.matches("Card 2").count(), 1);
        assert_eq!(g.card_at(60, 10), Some(3));
    }
}
