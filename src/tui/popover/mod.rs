//! Popover primitives
//!
//! - [`controller`]: open/close state, controlled or uncontrolled
//! - [`presenter`]: trigger + portal-mounted content with dismissal listeners
//! - [`document`]: screen-wide pointer/key listeners with RAII removal
//! - [`transition`]: tick-driven enter/exit animation
//! - [`morph`]: shared rectangle between a trigger and its content

mod controller;
mod document;
mod morph;
mod presenter;
mod transition;

pub use controller::{ControlledOpen, InstanceId, PopoverConfig, PopoverHandle};
pub use document::{Document, DocumentEvent, EventKind, ListenerGuard, Propagation};
pub use morph::{lerp_rect, MorphRegistry};
pub use presenter::{OverlayPresenter, PopoverTrigger};
pub use transition::{fade, Easing, Phase, Transition};
