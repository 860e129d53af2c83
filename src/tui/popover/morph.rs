//! Shared layout identity between a trigger and its content
//!
//! Triggers record where they were drawn under their popover's instance id.
//! Content looks the rectangle up and grows out of it while entering (and
//! shrinks back into it while exiting), so the two read as one element.

use super::controller::InstanceId;
use ratatui::layout::Rect;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MorphRegistry {
    origins: HashMap<InstanceId, Rect>,
}

impl MorphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where the trigger for `id` was drawn this frame
    pub fn record(&mut self, id: InstanceId, area: Rect) {
        self.origins.insert(id, area);
    }

    pub fn origin(&self, id: InstanceId) -> Option<Rect> {
        self.origins.get(&id).copied()
    }

    pub fn clear(&mut self) {
        self.origins.clear();
    }
}

/// Interpolate between two rectangles, `t` in [0, 1]
pub fn lerp_rect(from: Rect, to: Rect, t: f32) -> Rect {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u16, b: u16| -> u16 { (a as f32 + (b as f32 - a as f32) * t).round() as u16 };

    Rect::new(
        lerp(from.x, to.x),
        lerp(from.y, to.y),
        lerp(from.width, to.width),
        lerp(from.height, to.height),
    )
}

/// Shrink a rectangle around its centre
pub fn scale_rect(area: Rect, scale: f32) -> Rect {
    let scale = scale.clamp(0.0, 1.0);
    let width = (area.width as f32 * scale).round() as u16;
    let height = (area.height as f32 * scale).round() as u16;

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
