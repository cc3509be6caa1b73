//! TabBar: one title per section with the active one highlighted.

use crate::css::styles::Styles;
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Widget;

#[derive(Debug, Clone)]
struct Tab {
    title: String,
    enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TabBar {
    tabs: Vec<Tab>,
    active: usize,
}

impl TabBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(mut self, title: impl Into<String>, enabled: bool) -> Self {
        self.tabs.push(Tab {
            title: title.into(),
            enabled,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.tabs.get(index).is_some_and(|t| t.enabled)
    }

    /// Activate `index` if it exists and is enabled.
    pub fn select(&mut self, index: usize) -> bool {
        if self.is_enabled(index) {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Move to the next enabled tab in `direction`, wrapping around.
    pub fn cycle(&mut self, forward: bool) -> bool {
        let len = self.tabs.len();
        if len == 0 {
            return false;
        }
        for step in 1..len {
            let index = if forward {
                (self.active + step) % len
            } else {
                (self.active + len - step) % len
            };
            if self.select(index) {
                return true;
            }
        }
        false
    }
}

impl Widget for TabBar {
    fn widget_type(&self) -> &str {
        "TabBar"
    }

    fn render(&self, region: Region, styles: &Styles) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }
        let base = CellStyle::from_styles(styles);
        let mut strip = Strip::new(region.y, region.x);
        for (i, tab) in self.tabs.iter().enumerate() {
            let style = if i == self.active {
                base.clone().reverse().bold()
            } else if !tab.enabled {
                base.clone().dim()
            } else {
                base.clone()
            };
            strip.push_str(&format!(" {} ", tab.title), style);
            strip.push('\u{2502}', base.clone().dim());
        }
        strip.fill(region.width, base);
        vec![strip]
    }
}
