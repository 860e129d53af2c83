//! Top-level render target for overlays
//!
//! Overlay content is not drawn inside the area of the component that owns
//! it. It is drawn last, against the whole frame, so it escapes whatever
//! clipping its logical parent had. The inset around the content follows the
//! terminal width, the way a page would use responsive breakpoints.

use ratatui::layout::Rect;

/// Width classes used for overlay insets and compact layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// < 80 cols: split pane or small terminal
    Compact,
    /// 80-139 cols
    Normal,
    /// 140+ cols
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=79 => Self::Compact,
            80..=139 => Self::Normal,
            _ => Self::Wide,
        }
    }

    /// (columns, rows) kept free around overlay content
    fn inset(self) -> (u16, u16) {
        match self {
            Self::Compact => (1, 1),
            Self::Normal => (4, 2),
            Self::Wide => (12, 3),
        }
    }
}

/// Rectangle overlay content occupies within the whole frame
pub fn target(frame: Rect) -> Rect {
    let (dx, dy) = Breakpoint::from_width(frame.width).inset();
    let dx = dx.min(frame.width / 4);
    let dy = dy.min(frame.height / 4);

    Rect::new(
        frame.x + dx,
        frame.y + dy,
        frame.width.saturating_sub(dx * 2),
        frame.height.saturating_sub(dy * 2),
    )
}

/// Centre a fixed-size box within `area`, clamped to fit
pub fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
