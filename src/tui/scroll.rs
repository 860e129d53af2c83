// Scroll state for overlay bodies and other tall content
//
// Each component owns its scroll state; App only routes input.
// Content height is only known at render time, so renderers report
// dimensions every frame and the offset is clamped against them.

/// Scroll state for a single scrollable region
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Line at the top of the viewport
    offset: usize,

    /// Total number of lines in the content
    total: usize,

    /// Number of lines visible in the viewport
    viewport: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update content and viewport dimensions
    /// Call this each render frame with current sizes
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        // Before the first render the size is unknown; render clamps later
        if self.total == 0 || self.offset < self.max_offset() {
            self.offset += 1;
        }
    }

    pub fn page_up(&mut self) {
        let page = self.viewport.max(1);
        self.offset = self.offset.saturating_sub(page);
    }

    pub fn page_down(&mut self) {
        let page = self.viewport.max(1);
        self.offset = (self.offset + page).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Back to the top with unknown dimensions (content replaced)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Check if content overflows viewport (scrollbar needed)
    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}
