//! Overlay presentation for a popover
//!
//! [`PopoverTrigger`] is the clickable half: it opens the popover and records
//! where it was drawn so the content can morph out of it.
//!
//! [`OverlayPresenter`] is the content half. It follows the controller's
//! logical state through [`OverlayPresenter::sync`], which the UI loop calls
//! after every handled event:
//!
//! - closed -> open: attach the outside-pointer and Escape listeners, start
//!   the enter transitions
//! - open -> closed: drop both listener guards, start the exit transitions
//!
//! Listener lifetime follows the open flag only. The exit animation keeps
//! drawing after the listeners are gone, and dropping the presenter drops
//! the guards with it.

use super::controller::{InstanceId, PopoverHandle};
use super::document::{Document, DocumentEvent, EventKind, ListenerGuard, Propagation};
use super::morph::{lerp_rect, scale_rect, MorphRegistry};
use super::transition::{fade, zoom, Transition};
use crate::tui::portal;
use crate::tui::theme::Theme;
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

const CONTENT_DURATION: Duration = Duration::from_millis(250);
const BACKDROP_DURATION: Duration = Duration::from_millis(200);

/// Lowest backdrop opacity once fully shown
const BACKDROP_DIM: f32 = 0.4;

/// Clickable element that opens a popover
pub struct PopoverTrigger {
    popover: PopoverHandle,
    area: Cell<Option<Rect>>,
}

impl PopoverTrigger {
    pub fn new(popover: PopoverHandle) -> Self {
        Self {
            popover,
            area: Cell::new(None),
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        self.popover.instance_id()
    }

    pub fn activate(&self) {
        self.popover.open();
    }

    /// Hit-test against where the trigger was last drawn
    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.get().is_some_and(|area| {
            DocumentEvent::PointerDown { column, row }.is_inside(area)
        })
    }

    /// Draw the trigger and record its rectangle for the morph
    pub fn render(
        &self,
        f: &mut Frame,
        area: Rect,
        label: Line<'_>,
        style: Style,
        morph: &mut MorphRegistry,
    ) {
        self.area.set(Some(area));
        morph.record(self.popover.instance_id(), area);

        // The content has taken over the trigger's identity while open
        let style = if self.popover.is_open() {
            fade(style, 0.0)
        } else {
            style
        };
        f.render_widget(Paragraph::new(label).style(style), area);
    }
}

/// Content half of a popover, mounted into the portal while open
pub struct OverlayPresenter {
    popover: PopoverHandle,
    document: Document,
    listeners: Option<[ListenerGuard; 2]>,
    /// Where the content sits on screen; read by the pointer listener
    content_area: Rc<Cell<Option<Rect>>>,
    close_button: Cell<Option<Rect>>,
    content: Transition,
    backdrop: Transition,
}

impl OverlayPresenter {
    pub fn new(popover: PopoverHandle, document: Document) -> Self {
        let mut presenter = Self {
            popover,
            document,
            listeners: None,
            content_area: Rc::new(Cell::new(None)),
            close_button: Cell::new(None),
            content: Transition::new(CONTENT_DURATION),
            backdrop: Transition::new(BACKDROP_DURATION),
        };
        presenter.sync();
        presenter
    }

    pub fn popover(&self) -> &PopoverHandle {
        &self.popover
    }

    pub fn is_open(&self) -> bool {
        self.popover.is_open()
    }

    /// Whether the content is on screen (open, or still animating out)
    pub fn is_mounted(&self) -> bool {
        self.content.is_visible()
    }

    #[allow(dead_code)] // Inspected by tests
    pub fn listeners_attached(&self) -> bool {
        self.listeners.is_some()
    }

    /// Reconcile listeners and transitions with the controller's state
    pub fn sync(&mut self) {
        let open = self.popover.is_open();

        match (open, self.listeners.is_some()) {
            (true, false) => {
                self.listeners = Some([self.pointer_listener(), self.escape_listener()]);
                self.content.show();
                self.backdrop.show();
                tracing::debug!(
                    "{} mounted, dismissal listeners attached ({} on document)",
                    self.popover.instance_id(),
                    self.document.listener_count()
                );
            }
            (false, true) => {
                self.listeners = None;
                self.content_area.set(None);
                self.close_button.set(None);
                self.content.hide();
                self.backdrop.hide();
                tracing::debug!(
                    "{} unmounting, dismissal listeners detached ({} on document)",
                    self.popover.instance_id(),
                    self.document.listener_count()
                );
            }
            _ => {}
        }
    }

    fn pointer_listener(&self) -> ListenerGuard {
        let popover = self.popover.clone();
        let content_area = self.content_area.clone();

        self.document
            .add_listener(EventKind::PointerDown, move |event| match content_area.get() {
                Some(area) if event.is_inside(area) => Propagation::Stop,
                Some(_) => {
                    tracing::debug!("{} dismissed by outside click", popover.instance_id());
                    popover.close();
                    Propagation::Continue
                }
                // Not laid out yet; there is no inside to compare against
                None => Propagation::Continue,
            })
    }

    fn escape_listener(&self) -> ListenerGuard {
        let popover = self.popover.clone();

        self.document.add_listener(EventKind::KeyDown, move |event| match event {
            DocumentEvent::KeyDown(KeyCode::Esc) => {
                tracing::debug!("{} dismissed by Escape", popover.instance_id());
                popover.close();
                Propagation::Stop
            }
            _ => Propagation::Continue,
        })
    }

    pub fn advance(&mut self, dt: Duration) {
        self.content.advance(dt);
        self.backdrop.advance(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.content.is_animating() || self.backdrop.is_animating()
    }

    /// Resolve the portal rectangle and publish it to the pointer listener
    pub fn layout(&self, frame: Rect) -> Rect {
        let target = portal::target(frame);
        if self.popover.is_open() {
            self.content_area.set(Some(target));
        }
        target
    }

    /// Whether a click landed on the `[x]` in the content border
    pub fn hits_close_button(&self, column: u16, row: u16) -> bool {
        self.close_button.get().is_some_and(|area| {
            DocumentEvent::PointerDown { column, row }.is_inside(area)
        })
    }

    /// Draw backdrop and content over the whole frame
    ///
    /// `body` draws into the inner content area; it is faded along with the
    /// frame once it returns.
    pub fn render(
        &self,
        f: &mut Frame,
        morph: &MorphRegistry,
        theme: &Theme,
        title: &str,
        body: impl FnOnce(&mut Frame, Rect),
    ) {
        if !self.is_mounted() {
            return;
        }

        let frame = f.area();
        let target = self.layout(frame);

        let backdrop = 1.0 - self.backdrop.progress() * (1.0 - BACKDROP_DIM);
        fade_area(f, frame, backdrop);

        let p = self.content.progress();
        let area = match morph.origin(self.popover.instance_id()) {
            Some(origin) => lerp_rect(origin, target, p),
            None => scale_rect(target, zoom(p)),
        };
        if area.width < 8 || area.height < 3 {
            return;
        }

        f.render_widget(Clear, area);

        let close_style = Style::default().fg(theme.muted).add_modifier(Modifier::BOLD);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.highlight))
            .style(Style::default().bg(theme.background).fg(theme.foreground))
            .title(Span::styled(
                format!(" {} ", title),
                Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
            ))
            .title(Line::from(Span::styled("[x]", close_style)).right_aligned())
            .title_bottom(Line::from(" Esc close ").centered());

        let inner = block.inner(area);
        f.render_widget(block, area);
        self.close_button.set(Some(Rect::new(
            area.right().saturating_sub(4),
            area.y,
            3,
            1,
        )));

        body(f, inner);
        fade_area(f, area, p);
    }
}

/// Apply [`fade`] to every cell in `area`
fn fade_area(f: &mut Frame, area: Rect, opacity: f32) {
    if opacity >= 0.999 {
        return;
    }
    let buffer = f.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                let style = fade(cell.style(), opacity);
                cell.set_style(style);
            }
        }
    }
}
