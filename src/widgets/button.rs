//! Button: a labelled action in the form's button bar.

use crate::css::declarations::parse_declarations;
use crate::css::styles::Styles;
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Widget;

#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    styles: Styles,
    enabled: bool,
    focused: bool,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            styles: Styles::new(),
            enabled: true,
            focused: false,
        }
    }

    /// Apply a declaration string such as `color: white; background: green`.
    pub fn with_style(mut self, declarations: &str) -> Self {
        self.styles = parse_declarations(declarations);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Columns the button occupies.
    pub fn width(&self) -> i32 {
        self.label.chars().count() as i32 + 4
    }
}

impl Widget for Button {
    fn widget_type(&self) -> &str {
        "Button"
    }

    fn can_focus(&self) -> bool {
        self.enabled
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Own styles take precedence over the inherited ones.
    fn render(&self, region: Region, styles: &Styles) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }
        let mut style = CellStyle::from_styles(&styles.merge(&self.styles));
        if !self.enabled {
            style = style.dim();
        } else if self.focused {
            style = style.reverse();
        }
        let text = format!("[ {} ]", self.label);
        vec![Strip::text(region.y, region.x, region.width.min(self.width()), &text, style)]
    }
}
