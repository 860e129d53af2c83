//! Popover open/close state
//!
//! A controller owns the open flag of exactly one popover instance. The
//! ownership mode is chosen at construction and never changes:
//!
//! - **Uncontrolled**: the controller keeps the flag itself, seeded from
//!   `default_open`.
//! - **Controlled**: the caller owns the flag through a [`ControlledOpen`]
//!   cell. Every read goes to that cell, so the caller can override the
//!   state at any time (e.g. a close button that writes `false` directly).
//!
//! `open()` / `close()` always notify the `on_open_change` listener, even when
//! the state does not change.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity shared by a trigger and its content, used for morph animation only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "popover-{}", self.0)
    }
}

/// Caller-owned open flag for controlled popovers
///
/// Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct ControlledOpen(Rc<Cell<bool>>);

impl ControlledOpen {
    pub fn new(open: bool) -> Self {
        Self(Rc::new(Cell::new(open)))
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, open: bool) {
        self.0.set(open);
    }
}

/// Who owns the open flag
#[derive(Debug, Clone)]
pub enum OpenMode {
    /// Controller owns the flag, starting at `default_open`
    Uncontrolled { default_open: bool },
    /// Caller owns the flag
    Controlled(ControlledOpen),
}

/// Listener invoked with the requested state on every `open()` / `close()`
pub type OpenChangeFn = Box<dyn FnMut(bool)>;

/// Construction parameters for [`PopoverController`]
pub struct PopoverConfig {
    pub mode: OpenMode,
    pub on_open_change: Option<OpenChangeFn>,
}

impl PopoverConfig {
    pub fn uncontrolled(default_open: bool) -> Self {
        Self {
            mode: OpenMode::Uncontrolled { default_open },
            on_open_change: None,
        }
    }

    pub fn controlled(open: ControlledOpen) -> Self {
        Self {
            mode: OpenMode::Controlled(open),
            on_open_change: None,
        }
    }

    pub fn on_open_change(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.on_open_change = Some(Box::new(f));
        self
    }
}

impl Default for PopoverConfig {
    fn default() -> Self {
        Self::uncontrolled(false)
    }
}

/// Resolved state; the variant is fixed for the controller's lifetime
enum OpenState {
    Uncontrolled(bool),
    Controlled(ControlledOpen),
}

/// Open/close state machine for one popover instance
pub struct PopoverController {
    id: InstanceId,
    state: OpenState,
    on_open_change: Option<OpenChangeFn>,
    /// Set while `on_open_change` runs from a handle
    notifying: bool,
    /// Requests made by the listener itself, notified once it returns
    queued: VecDeque<bool>,
}

impl PopoverController {
    pub fn new(config: PopoverConfig) -> Self {
        let state = match config.mode {
            OpenMode::Uncontrolled { default_open } => OpenState::Uncontrolled(default_open),
            OpenMode::Controlled(flag) => OpenState::Controlled(flag),
        };

        Self {
            id: InstanceId::next(),
            state,
            on_open_change: config.on_open_change,
            notifying: false,
            queued: VecDeque::new(),
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        self.id
    }

    /// Current state: the controlled flag if controlled, else internal state
    pub fn is_open(&self) -> bool {
        match &self.state {
            OpenState::Uncontrolled(open) => *open,
            OpenState::Controlled(flag) => flag.get(),
        }
    }

    pub fn open(&mut self) {
        self.apply(true);
        self.notify(true);
    }

    pub fn close(&mut self) {
        self.apply(false);
        self.notify(false);
    }

    /// Update internal state; controlled popovers leave it to the listener
    fn apply(&mut self, open: bool) {
        if let OpenState::Uncontrolled(current) = &mut self.state {
            *current = open;
        }
    }

    fn notify(&mut self, open: bool) {
        if let Some(listener) = self.on_open_change.as_mut() {
            listener(open);
        }
    }
}

/// Shared reference to a controller
///
/// Trigger, content and dismissal listeners each hold one of these. The
/// `on_open_change` listener runs with the controller unborrowed, so it may
/// read the popover back (e.g. `is_open()`) or call `open()`/`close()`.
/// A call made from inside the listener takes effect at once and is
/// notified after the current notification returns.
#[derive(Clone)]
pub struct PopoverHandle(Rc<RefCell<PopoverController>>);

impl PopoverHandle {
    pub fn new(config: PopoverConfig) -> Self {
        Self(Rc::new(RefCell::new(PopoverController::new(config))))
    }

    pub fn instance_id(&self) -> InstanceId {
        self.0.borrow().instance_id()
    }

    pub fn is_open(&self) -> bool {
        self.0.borrow().is_open()
    }

    pub fn open(&self) {
        self.request(true);
    }

    pub fn close(&self) {
        self.request(false);
    }

    fn request(&self, open: bool) {
        {
            let mut controller = self.0.borrow_mut();
            controller.apply(open);
            if controller.notifying {
                controller.queued.push_back(open);
                return;
            }
            controller.notifying = true;
        }

        tracing::trace!("{} requested open={}", self.instance_id(), open);

        let mut next = Some(open);
        while let Some(open) = next {
            let listener = self.0.borrow_mut().on_open_change.take();
            if let Some(mut listener) = listener {
                listener(open);
                self.0.borrow_mut().on_open_change = Some(listener);
            }

            let mut controller = self.0.borrow_mut();
            next = controller.queued.pop_front();
            if next.is_none() {
                controller.notifying = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recorder() -> (Rc<RefCell<Vec<bool>>>, impl FnMut(bool) + 'static) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |open| sink.borrow_mut().push(open))
    }

    #[test]
    fn uncontrolled_starts_at_default() {
        assert!(!PopoverController::new(PopoverConfig::uncontrolled(false)).is_open());
        assert!(PopoverController::new(PopoverConfig::uncontrolled(true)).is_open());
    }

    #[test]
    fn uncontrolled_open_close_notifies_every_call() {
        let (calls, listener) = recorder();
        let mut popover =
            PopoverController::new(PopoverConfig::uncontrolled(false).on_open_change(listener));

        popover.open();
        assert!(popover.is_open());
        popover.open();
        assert!(popover.is_open());
        popover.close();
        assert!(!popover.is_open());

        assert_eq!(*calls.borrow(), vec![true, true, false]);
    }

    #[test]
    fn controlled_reads_caller_flag() {
        let flag = ControlledOpen::new(false);
        let (calls, listener) = recorder();
        let mut popover = PopoverController::new(
            PopoverConfig::controlled(flag.clone()).on_open_change(listener),
        );

        // The listener does not write the flag back, so the state stays closed
        popover.open();
        assert!(!popover.is_open());
        assert_eq!(*calls.borrow(), vec![true]);

        flag.set(true);
        assert!(popover.is_open());
        popover.close();
        assert!(popover.is_open());
    }

    #[test]
    fn controlled_with_write_back_listener() {
        let flag = ControlledOpen::new(false);
        let sink = flag.clone();
        let popover = PopoverHandle::new(
            PopoverConfig::controlled(flag.clone()).on_open_change(move |open| sink.set(open)),
        );

        popover.open();
        assert!(popover.is_open());

        // External close bypasses the controller entirely
        flag.set(false);
        assert!(!popover.is_open());
    }

    #[test]
    fn instance_ids_are_unique_and_stable() {
        let a = PopoverHandle::new(PopoverConfig::default());
        let b = PopoverHandle::new(PopoverConfig::default());
        let id = a.instance_id();

        a.open();
        a.close();

        assert_eq!(a.instance_id(), id);
        assert_ne!(a.instance_id(), b.instance_id());
        assert_eq!(a.clone().instance_id(), id);
    }

    #[test]
    fn listener_may_read_back_through_handle() {
        let seen = Rc::new(Cell::new(None));
        let slot: Rc<RefCell<Option<PopoverHandle>>> = Rc::new(RefCell::new(None));

        let seen_in = seen.clone();
        let slot_in = slot.clone();
        let popover = PopoverHandle::new(PopoverConfig::uncontrolled(false).on_open_change(
            move |_| {
                if let Some(handle) = slot_in.borrow().as_ref() {
                    seen_in.set(Some(handle.is_open()));
                }
            },
        ));
        *slot.borrow_mut() = Some(popover.clone());

        popover.open();
        assert_eq!(seen.get(), Some(true));

        // Listener is restored after each call
        popover.close();
        assert_eq!(seen.get(), Some(false));
    }

    #[test]
    fn listener_may_close_from_inside_open() {
        let (calls, mut record) = recorder();
        let slot: Rc<RefCell<Option<PopoverHandle>>> = Rc::new(RefCell::new(None));

        let slot_in = slot.clone();
        let popover = PopoverHandle::new(PopoverConfig::uncontrolled(false).on_open_change(
            move |open| {
                record(open);
                if open {
                    if let Some(handle) = slot_in.borrow().as_ref() {
                        handle.close();
                    }
                }
            },
        ));
        *slot.borrow_mut() = Some(popover.clone());

        popover.open();
        assert_eq!(*calls.borrow(), vec![true, false]);
        assert!(!popover.is_open());

        popover.close();
        assert_eq!(*calls.borrow(), vec![true, false, false]);
        slot.borrow_mut().take();
    }

    proptest! {
        #[test]
        fn uncontrolled_sequence_matches_net_effect(
            default_open in any::<bool>(),
            ops in proptest::collection::vec(any::<bool>(), 0..64),
        ) {
            let (calls, listener) = recorder();
            let popover = PopoverHandle::new(
                PopoverConfig::uncontrolled(default_open).on_open_change(listener),
            );

            for &open in &ops {
                if open { popover.open() } else { popover.close() }
            }

            let expected = ops.last().copied().unwrap_or(default_open);
            prop_assert_eq!(popover.is_open(), expected);
            prop_assert_eq!(&*calls.borrow(), &ops);
        }

        #[test]
        fn controlled_always_reflects_flag(
            ops in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..64),
        ) {
            let flag = ControlledOpen::new(false);
            let popover = PopoverHandle::new(PopoverConfig::controlled(flag.clone()));

            for &(call_open, external) in &ops {
                if call_open { popover.open() } else { popover.close() }
                prop_assert_eq!(popover.is_open(), flag.get());
                flag.set(external);
                prop_assert_eq!(popover.is_open(), external);
            }
        }
    }
}
