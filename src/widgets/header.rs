//! Header: the window title across the top row.

use crate::css::styles::Styles;
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Widget;

use super::center;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// A single reversed row holding the centered title.
#[derive(Debug, Clone)]
pub struct Header {
    title: String,
}

impl Header {
    /// Create a header showing `title`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// The title text.
    pub fn title(&self) -> &str {
        &self.title
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

impl Widget for Header {
    fn widget_type(&self) -> &str {
        "Header"
    }

    fn render(&self, region: Region, styles: &Styles) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }
        let style = CellStyle::from_styles(styles).bold().reverse();
        let text = center(&self.title, region.width as usize);
        vec![Strip::text(region.y, region.x, region.width, &text, style)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::render_to_string;

    #[test]
    fn title_is_centered_and_bold() {
        let header = Header::new("Survey");
        assert_eq!(header.title(), "Survey");
        assert_eq!(render_to_string(&header, 12, 1), "   Survey");
        let strips = header.render(Region::new(0, 0, 12, 1), &Styles::new());
        assert!(strips[0].cells.iter().all(|c| c.style.bold && c.style.reverse));
        assert_eq!(strips[0].width(), 12);
    }
}
