//! Vertical scroll state for the form body.

/// Scroll offset clamped to `[0, content_height - viewport_height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    pub offset: i32,
    pub content_height: i32,
    pub viewport_height: i32,
}

impl ScrollState {
    pub fn new(content_height: i32, viewport_height: i32) -> Self {
        Self {
            offset: 0,
            content_height,
            viewport_height,
        }
    }

    pub fn max_scroll(&self) -> i32 {
        (self.content_height - self.viewport_height).max(0)
    }

    pub fn scroll_to(&mut self, y: i32) {
        self.offset = y.clamp(0, self.max_scroll());
    }

    pub fn scroll_by(&mut self, dy: i32) {
        self.scroll_to(self.offset + dy);
    }

    /// Update both heights and re-clamp the offset.
    pub fn set_sizes(&mut self, content_height: i32, viewport_height: i32) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.scroll_to(self.offset);
    }

    pub fn is_scrollable(&self) -> bool {
        self.content_height > self.viewport_height
    }

    /// Scroll the least amount that brings rows `[top, top + height)` into view.
    /// Rows taller than the viewport align to their top.
    pub fn scroll_into_view(&mut self, top: i32, height: i32) {
        if top < self.offset || height > self.viewport_height {
            self.scroll_to(top);
        } else if top + height > self.offset + self.viewport_height {
            self.scroll_to(top + height - self.viewport_height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_clamped() {
        let mut s = ScrollState::new(30, 10);
        s.scroll_to(100);
        assert_eq!(s.offset, 20);
        s.scroll_by(-50);
        assert_eq!(s.offset, 0);
        assert!(s.is_scrollable());
        assert!(!ScrollState::new(5, 10).is_scrollable());
    }

    #[test]
    fn scroll_into_view_moves_minimally() {
        let mut s = ScrollState::new(40, 10);
        s.scroll_into_view(12, 2);
        assert_eq!(s.offset, 4);
        s.scroll_into_view(6, 1);
        assert_eq!(s.offset, 4);
        s.scroll_into_view(1, 1);
        assert_eq!(s.offset, 1);
    }

    #[test]
    fn shrinking_content_reclamps() {
        let mut s = ScrollState::new(40, 10);
        s.scroll_to(30);
        s.set_sizes(15, 10);
        assert_eq!(s.offset, 5);
    }
}
