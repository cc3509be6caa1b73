//! Cell geometry for the terminal frame.
//!
//! Coordinates are terminal cells with the origin at the top-left corner.

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// A displacement in cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A rectangle of cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Overlap of two regions; empty when they do not meet.
    pub fn intersection(&self, other: Region) -> Region {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Region::new(x, y, (right - x).max(0), (bottom - y).max(0))
    }

    pub fn translate(&self, offset: Offset) -> Region {
        Region::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Split off `height` rows on top. Returns `(top, rest)`.
    pub fn split_top(&self, height: i32) -> (Region, Region) {
        let height = height.clamp(0, self.height.max(0));
        (
            Region::new(self.x, self.y, self.width, height),
            Region::new(self.x, self.y + height, self.width, self.height - height),
        )
    }
}

// ===========================================================================
// Tests
// ===========================================================================
