//! Footer: status message on the left, key hints on the right.

use crate::css::styles::Styles;
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Widget;

use super::truncate;

#[derive(Debug, Clone, Default)]
pub struct Footer {
    status: Option<String>,
    error: bool,
    hints: Vec<(String, String)>,
}

impl Footer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key hint such as `("^S", "Submit")`.
    pub fn with_hint(mut self, key: impl Into<String>, action: impl Into<String>) -> Self {
        self.hints.push((key.into(), action.into()));
        self
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Show a neutral message, replacing any previous one.
    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status;
        self.error = false;
    }

    /// Show a message in the error color.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.error = true;
    }

    fn hint_text(&self) -> String {
        self.hints
            .iter()
            .map(|(key, action)| format!("{key} {action}"))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

impl Widget for Footer {
    fn widget_type(&self) -> &str {
        "Footer"
    }

    fn render(&self, region: Region, styles: &Styles) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }
        let base = CellStyle::from_styles(styles).reverse();
        let width = region.width as usize;
        let hints = self.hint_text();
        let hint_len = hints.chars().count();
        let status_len = self.status.as_ref().map_or(0, |s| s.chars().count());
        // Hints are dropped before the status is truncated.
        let show_hints = hint_len > 0 && status_len + hint_len + 1 <= width;
        let status_width = if show_hints { width - hint_len - 1 } else { width };

        let mut strip = Strip::new(region.y, region.x);
        if let Some(status) = &self.status {
            let style = if self.error { base.clone().fg("red").bold() } else { base.clone() };
            strip.push_str(&truncate(status, status_width), style);
        }
        strip.fill(status_width as i32, base.clone());
        if show_hints {
            strip.push(' ', base.clone());
            strip.push_str(&hints, base.clone().dim());
        }
        strip.fill(region.width, base);
        vec![strip]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::render_to_string;

    #[test]
    fn hints_right_aligned() {
        let footer = Footer::new().with_hint("^S", "Submit").with_hint("Esc", "Cancel");
        assert_eq!(render_to_string(&footer, 24, 1), "   ^S Submit  Esc Cancel");
    }

    #[test]
    fn status_shows_and_hints_drop_when_narrow() {
        let mut footer = Footer::new().with_hint("^S", "Submit");
        footer.set_error("Missing: name");
        assert_eq!(render_to_string(&footer, 10, 1), "Missing: n");
        let strips = footer.render(Region::new(0, 0, 10, 1), &Styles::new());
        assert_eq!(strips[0].cells[0].style.fg.as_deref(), Some("red"));

        footer.set_status(None);
        assert_eq!(footer.status(), None);
    }
}
