//! Strip: one row of styled terminal cells.
//!
//! Widgets render into `Vec<Strip>`; the compositor places strips into its
//! screen buffer.

use crate::css::styles::Styles;

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Visual style of a single cell. Colors are names or `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub reverse: bool,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_styles(styles: &Styles) -> Self {
        let flags = styles.text_style.unwrap_or_default();
        CellStyle {
            fg: styles.color.clone(),
            bg: styles.background.clone(),
            bold: flags.bold.unwrap_or(false),
            dim: flags.dim.unwrap_or(false),
            italic: flags.italic.unwrap_or(false),
            underline: flags.underline.unwrap_or(false),
            strikethrough: flags.strikethrough.unwrap_or(false),
            reverse: flags.reverse.unwrap_or(false),
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn fg(mut self, color: impl Into<String>) -> Self {
        self.fg = Some(color.into());
        self
    }
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub style: CellStyle,
}

impl StyledCell {
    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    pub fn blank() -> Self {
        Self::new(' ', CellStyle::default())
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::blank()
    }
}

// ---------------------------------------------------------------------------
// Strip
// ---------------------------------------------------------------------------

/// A horizontal run of cells at row `y`, starting at column `x_offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    pub y: i32,
    pub x_offset: i32,
    pub cells: Vec<StyledCell>,
}

impl Strip {
    pub fn new(y: i32, x_offset: i32) -> Self {
        Self {
            y,
            x_offset,
            cells: Vec::new(),
        }
    }

    /// A strip holding `text`, cut to `width` cells and padded to it.
    pub fn text(y: i32, x_offset: i32, width: i32, text: &str, style: CellStyle) -> Self {
        let mut strip = Strip::new(y, x_offset);
        strip.push_str(text, style.clone());
        strip.fill(width, style);
        strip
    }

    pub fn push(&mut self, ch: char, style: CellStyle) {
        self.cells.push(StyledCell::new(ch, style));
    }

    pub fn push_str(&mut self, text: &str, style: CellStyle) {
        self.cells
            .extend(text.chars().map(|ch| StyledCell::new(ch, style.clone())));
    }

    pub fn width(&self) -> i32 {
        self.cells.len() as i32
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x_offset + self.width()
    }

    /// Pad with blanks in `style`, or truncate, to exactly `width` cells.
    pub fn fill(&mut self, width: i32, style: CellStyle) {
        let width = width.max(0) as usize;
        self.cells.resize(width, StyledCell::new(' ', style));
    }

    /// Only the cells with absolute columns in `[x_start, x_end)`.
    pub fn crop(&self, x_start: i32, x_end: i32) -> Strip {
        let first = (x_start - self.x_offset).clamp(0, self.width());
        let last = (x_end - self.x_offset).clamp(first, self.width());
        Strip {
            y: self.y,
            x_offset: self.x_offset + first,
            cells: self
                .cells
                .get(first as usize..last as usize)
                .map(<[StyledCell]>::to_vec)
                .unwrap_or_default(),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
