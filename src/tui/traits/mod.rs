//! Component capability traits
//!
//! Components declare what they can do instead of App knowing how to
//! drive each one:
//!
//! - [`Interactive`] - consumes keyboard input, or lets it bubble up
//! - [`Scrollable`] - owns a [`ScrollState`](crate::tui::scroll::ScrollState)
//!
//! ```text
//! KeyEvent ──▶ overlay listeners ──▶ App (global keys) ──▶ focused component
//!                                                           │
//!                                            Handled::Yes / Handled::No
//! ```

mod interactive;
mod scrollable;

pub use interactive::{Handled, Interactive};
pub use scrollable::Scrollable;
