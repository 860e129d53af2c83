//! Toast notification component
//!
//! A non-blocking message in the bottom-right corner that expires on its
//! own. Drawn after everything else, overlays included.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const DEFAULT_DURATION: Duration = Duration::from_secs(2);

pub struct Toast {
    pub message: String,
    /// Time left on screen, counted down by the UI tick
    remaining: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            remaining: DEFAULT_DURATION,
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        // 2 cells of padding each side plus borders
        let width = (self.message.width() as u16 + 4).min(area.width.saturating_sub(4));
        let height = 3;

        let x = area.right().saturating_sub(width + 2);
        let y = area.bottom().saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height.min(area.height));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.highlight))
            .style(Style::default().bg(theme.background));

        let text = Paragraph::new(self.message.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.foreground))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ticks() {
        let mut toast = Toast::new("Reloaded");
        toast.advance(Duration::from_millis(1500));
        assert!(!toast.is_expired());
        toast.advance(Duration::from_millis(600));
        assert!(toast.is_expired());
    }
}
