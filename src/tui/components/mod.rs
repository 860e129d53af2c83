// Components module - reusable UI building blocks
//
// Page furniture (header, status bar, toast) plus the interactive pieces:
// - AnimatedTabs: one tab per post, animated pane switching
// - BlogCard: post summary with a "Read More" popover
// - DetailLoader: lazy per-card detail state
// - LayoutGrid: gallery cards that expand into a shared overlay
// - Skeleton: pulsing loading placeholders

pub mod animated_tabs;
pub mod blog_card;
pub mod detail_loader;
pub mod header;
pub mod layout_grid;
pub mod skeleton;
pub mod status_bar;
pub mod toast;

pub use animated_tabs::{AnimatedTabs, Tab};
pub use blog_card::BlogCard;
pub use layout_grid::{Card, LayoutGrid};
pub use toast::Toast;
