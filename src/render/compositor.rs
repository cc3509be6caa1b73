//! Screen buffer and frame diffing.
//!
//! The `Compositor` holds one frame as a grid of [`StyledCell`]s. Rendered
//! strips are clipped into it, and [`Compositor::diff`] yields only the cells
//! that changed against the previous frame.

use super::strip::{Strip, StyledCell};
use crate::geometry::Region;

// ---------------------------------------------------------------------------
// CellUpdate
// ---------------------------------------------------------------------------

/// A cell that differs from the previous frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

// ---------------------------------------------------------------------------
// Compositor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compositor {
    /// `screen[y][x]`.
    screen: Vec<Vec<StyledCell>>,
    pub width: u16,
    pub height: u16,
}

impl Compositor {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: blank_screen(width, height),
            width,
            height,
        }
    }

    /// Resize and blank the buffer.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.screen = blank_screen(width, height);
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        for row in &mut self.screen {
            row.fill(StyledCell::blank());
        }
    }

    pub fn bounds(&self) -> Region {
        Region::new(0, 0, i32::from(self.width), i32::from(self.height))
    }

    /// Write strips into the buffer, clipped to `clip` and the screen.
    pub fn place_strips(&mut self, strips: &[Strip], clip: Region) {
        let clip = clip.intersection(self.bounds());
        if clip.is_empty() {
            return;
        }
        for strip in strips {
            if strip.y < clip.y || strip.y >= clip.bottom() {
                continue;
            }
            let row = &mut self.screen[strip.y as usize];
            let visible = strip.crop(clip.x, clip.right());
            for (i, cell) in visible.cells.into_iter().enumerate() {
                row[visible.x_offset as usize + i] = cell;
            }
        }
    }

    /// Cells of `self` that differ from `previous`. A size change repaints
    /// everything.
    pub fn diff(&self, previous: &Compositor) -> Vec<CellUpdate> {
        let resized = self.width != previous.width || self.height != previous.height;
        let mut updates = Vec::new();
        for (y, row) in self.screen.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if resized || previous.screen[y][x] != *cell {
                    updates.push(CellUpdate {
                        x: x as u16,
                        y: y as u16,
                        cell: cell.clone(),
                    });
                }
            }
        }
        updates
    }

    pub fn get_cell(&self, x: u16, y: u16) -> Option<&StyledCell> {
        self.screen
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
    }

    /// The characters of row `y`, right-trimmed.
    pub fn row_text(&self, y: u16) -> String {
        self.screen
            .get(y as usize)
            .map(|row| row.iter().map(|c| c.ch).collect::<String>())
            .map(|s| s.trim_end().to_owned())
            .unwrap_or_default()
    }
}

fn blank_screen(width: u16, height: u16) -> Vec<Vec<StyledCell>> {
    vec![vec![StyledCell::blank(); width as usize]; height as usize]
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip::CellStyle;

    fn strip(y: i32, x: i32, text: &str) -> Strip {
        let mut s = Strip::new(y, x);
        s.push_str(text, CellStyle::default());
        s
    }

    #[test]
    fn new_buffer_is_blank() {
        let c = Compositor::new(4, 2);
        assert_eq!(c.get_cell(3, 1), Some(&StyledCell::blank()));
        assert!(c.get_cell(4, 0).is_none());
        assert_eq!(c.row_text(0), "");
    }

    #[test]
    fn strips_are_clipped() {
        let mut c = Compositor::new(10, 3);
        c.place_strips(&[strip(1, 2, "Hello World")], Region::new(0, 0, 8, 3));
        assert_eq!(c.row_text(1), "  Hello");
        c.place_strips(&[strip(5, 0, "off-screen")], c.bounds());
        c.place_strips(&[strip(0, -3, "abcdef")], c.bounds());
        assert_eq!(c.row_text(0), "def");
    }

    #[test]
    fn diff_reports_changed_cells_only() {
        let previous = Compositor::new(5, 2);
        let mut next = previous.clone();
        next.place_strips(&[strip(1, 1, "ab")], next.bounds());
        let updates = next.diff(&previous);
        assert_eq!(updates.len(), 2);
        assert_eq!((updates[0].x, updates[0].y, updates[0].cell.ch), (1, 1, 'a'));
        assert!(next.diff(&next).is_empty());
    }

    #[test]
    fn diff_after_resize_repaints_all() {
        let previous = Compositor::new(2, 2);
        let next = Compositor::new(3, 2);
        assert_eq!(next.diff(&previous).len(), 6);
    }

    #[test]
    fn clear_blanks_buffer() {
        let mut c = Compositor::new(3, 1);
        c.place_strips(&[strip(0, 0, "xyz")], c.bounds());
        c.clear();
        assert_eq!(c.row_text(0), "");
    }
}
