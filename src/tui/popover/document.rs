//! Document-level event listeners
//!
//! The terminal screen plays the role of the document: overlays register
//! listeners for pointer-down and key-down events that happen anywhere on it.
//! Registration returns a [`ListenerGuard`]; dropping the guard removes the
//! listener, so an overlay cannot leak listeners past its own lifetime.
//!
//! Dispatch runs newest-first. A listener returning [`Propagation::Stop`]
//! hides the event from older listeners, which is how an inner overlay keeps
//! its clicks and Escape presses away from an outer one.

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Event delivered to document listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    PointerDown { column: u16, row: u16 },
    KeyDown(KeyCode),
}

impl DocumentEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::KeyDown(_) => EventKind::KeyDown,
        }
    }

    /// Whether this is a pointer-down inside `area`
    pub fn is_inside(&self, area: Rect) -> bool {
        match *self {
            Self::PointerDown { column, row } => {
                column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
            }
            Self::KeyDown(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PointerDown,
    KeyDown,
}

/// Whether older listeners still see the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

type Callback = Rc<RefCell<dyn FnMut(&DocumentEvent) -> Propagation>>;

struct Entry {
    id: u64,
    kind: EventKind,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

/// Listener registry for the whole screen
///
/// Cloning shares the registry.
#[derive(Clone, Default)]
pub struct Document {
    registry: Rc<RefCell<Registry>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it stays registered until the guard is dropped
    pub fn add_listener(
        &self,
        kind: EventKind,
        callback: impl FnMut(&DocumentEvent) -> Propagation + 'static,
    ) -> ListenerGuard {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.entries.push(Entry {
            id,
            kind,
            callback: Rc::new(RefCell::new(callback)),
        });

        ListenerGuard {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Deliver an event, newest listener first
    ///
    /// Listeners removed by an earlier listener in the same dispatch are
    /// skipped. Returns `Stop` if any listener stopped propagation.
    pub fn dispatch(&self, event: &DocumentEvent) -> Propagation {
        let snapshot: Vec<(u64, Callback)> = {
            let registry = self.registry.borrow();
            registry
                .entries
                .iter()
                .rev()
                .filter(|e| e.kind == event.kind())
                .map(|e| (e.id, e.callback.clone()))
                .collect()
        };

        for (id, callback) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            let result = (callback.borrow_mut())(event);
            if result == Propagation::Stop {
                return Propagation::Stop;
            }
        }

        Propagation::Continue
    }
}

/// Registration token; dropping it removes the listener
pub struct ListenerGuard {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().entries.retain(|e| e.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let c = Rc::new(Cell::new(0));
        (c.clone(), c)
    }

    #[test]
    fn dropping_guard_removes_listener() {
        let doc = Document::new();
        let (hits, sink) = counter();

        let guard = doc.add_listener(EventKind::KeyDown, move |_| {
            sink.set(sink.get() + 1);
            Propagation::Continue
        });
        doc.dispatch(&DocumentEvent::KeyDown(KeyCode::Esc));
        assert_eq!(doc.listener_count(), 1);

        drop(guard);
        doc.dispatch(&DocumentEvent::KeyDown(KeyCode::Esc));

        assert_eq!(hits.get(), 1);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn dispatch_filters_by_kind() {
        let doc = Document::new();
        let (hits, sink) = counter();
        let _guard = doc.add_listener(EventKind::PointerDown, move |_| {
            sink.set(sink.get() + 1);
            Propagation::Continue
        });

        doc.dispatch(&DocumentEvent::KeyDown(KeyCode::Esc));
        assert_eq!(hits.get(), 0);

        doc.dispatch(&DocumentEvent::PointerDown { column: 1, row: 1 });
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn newest_listener_can_stop_propagation() {
        let doc = Document::new();
        let (outer_hits, outer_sink) = counter();

        let _outer = doc.add_listener(EventKind::KeyDown, move |_| {
            outer_sink.set(outer_sink.get() + 1);
            Propagation::Continue
        });
        let _inner = doc.add_listener(EventKind::KeyDown, |_| Propagation::Stop);

        let result = doc.dispatch(&DocumentEvent::KeyDown(KeyCode::Esc));

        assert_eq!(result, Propagation::Stop);
        assert_eq!(outer_hits.get(), 0);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let doc = Document::new();
        let (hits, sink) = counter();

        let older = doc.add_listener(EventKind::KeyDown, move |_| {
            sink.set(sink.get() + 1);
            Propagation::Continue
        });
        let slot = Rc::new(RefCell::new(Some(older)));
        let slot_in = slot.clone();
        let _newer = doc.add_listener(EventKind::KeyDown, move |_| {
            slot_in.borrow_mut().take();
            Propagation::Continue
        });

        doc.dispatch(&DocumentEvent::KeyDown(KeyCode::Esc));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn guard_outliving_document_is_harmless() {
        let doc = Document::new();
        let guard = doc.add_listener(EventKind::KeyDown, |_| Propagation::Continue);
        drop(doc);
        drop(guard);
    }

    #[test]
    fn pointer_hit_testing() {
        let area = Rect::new(10, 5, 4, 2);
        assert!(DocumentEvent::PointerDown { column: 10, row: 5 }.is_inside(area));
        assert!(DocumentEvent::PointerDown { column: 13, row: 6 }.is_inside(area));
        assert!(!DocumentEvent::PointerDown { column: 14, row: 6 }.is_inside(area));
        assert!(!DocumentEvent::PointerDown { column: 9, row: 5 }.is_inside(area));
        assert!(!DocumentEvent::KeyDown(KeyCode::Esc).is_inside(area));
    }
}
