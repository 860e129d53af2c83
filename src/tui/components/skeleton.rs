//! Loading placeholders
//!
//! Bones are shaded blocks that pulse while something is loading.

use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

const PULSE_PERIOD: Duration = Duration::from_millis(1600);

/// One placeholder block: height in rows, width as a fraction of the area
#[derive(Debug, Clone, Copy)]
pub struct Bone {
    pub height: u16,
    pub width: f32,
}

impl Bone {
    pub const fn new(height: u16, width: f32) -> Self {
        Self { height, width }
    }
}

/// Pulse intensity in [0, 1] for the given animation clock
pub fn pulse(elapsed: Duration) -> f32 {
    let t = (elapsed.as_millis() % PULSE_PERIOD.as_millis()) as f32 / PULSE_PERIOD.as_millis() as f32;
    (1.0 - (t * std::f32::consts::TAU).cos()) / 2.0
}

/// Fill `area` with a single bone
pub fn render_bone(f: &mut Frame, area: Rect, theme: &Theme, pulse: f32) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let glyph = if pulse >= 0.5 { "▒" } else { "░" };
    let row = glyph.repeat(area.width as usize);
    let lines: Vec<Line> = (0..area.height).map(|_| Line::raw(row.clone())).collect();
    f.render_widget(
        Paragraph::new(lines).style(Style::default().fg(theme.skeleton)),
        area,
    );
}

/// Stack bones top to bottom with a one-row gap; stops when out of room
pub fn render_bones(f: &mut Frame, area: Rect, bones: &[Bone], theme: &Theme, pulse: f32) {
    let mut y = area.y;
    for bone in bones {
        if y >= area.bottom() {
            break;
        }
        let width = ((area.width as f32) * bone.width.clamp(0.0, 1.0)).round() as u16;
        let height = bone.height.min(area.bottom() - y);
        render_bone(f, Rect::new(area.x, y, width, height), theme, pulse);
        y = y.saturating_add(height + 1);
    }
}
