//! Label: the caption shown next to a field.

use crate::css::styles::Styles;
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Widget;

use super::truncate;

#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    required: bool,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            required: false,
        }
    }

    /// Mark the field as required; adds ` *` after the text.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caption as displayed.
    pub fn caption(&self) -> String {
        if self.required {
            format!("{} *", self.text)
        } else {
            self.text.clone()
        }
    }

    /// Columns needed to show the caption in full.
    pub fn width(&self) -> i32 {
        self.caption().chars().count() as i32
    }
}

impl Widget for Label {
    fn widget_type(&self) -> &str {
        "Label"
    }

    fn render(&self, region: Region, styles: &Styles) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }
        let text = truncate(&self.caption(), region.width as usize);
        vec![Strip::text(
            region.y,
            region.x,
            region.width,
            &text,
            CellStyle::from_styles(styles),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::render_to_string;

    #[test]
    fn required_marker() {
        assert_eq!(render_to_string(&Label::new("Name").required(true), 10, 1), "Name *");
        assert_eq!(Label::new("Name").required(true).width(), 6);
        assert_eq!(render_to_string(&Label::new("Name"), 10, 1), "Name");
    }

    #[test]
    fn truncates_to_region() {
        assert_eq!(render_to_string(&Label::new("Description"), 4, 1), "Desc");
    }
}
