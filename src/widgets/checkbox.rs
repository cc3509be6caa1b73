//! Checkbox: a boolean toggle rendered as `[x]` or `[ ]`.

use crate::css::styles::Styles;
use crate::event::input::{Key, KeyEvent};
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::{KeyResult, Widget};

#[derive(Debug, Clone, Default)]
pub struct Checkbox {
    checked: bool,
    focused: bool,
}

impl Checkbox {
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            focused: false,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }
}

impl Widget for Checkbox {
    fn widget_type(&self) -> &str {
        "Checkbox"
    }

    fn can_focus(&self) -> bool {
        true
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn render(&self, region: Region, styles: &Styles) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }
        let base = CellStyle::from_styles(styles);
        let mark = if self.checked { 'x' } else { ' ' };
        let mut strip = Strip::new(region.y, region.x);
        strip.push('[', base.clone());
        strip.push(mark, if self.focused { base.clone().reverse() } else { base.clone() });
        strip.push(']', base.clone());
        strip.fill(region.width, base);
        vec![strip]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyResult {
        match key.code {
            Key::Char(' ') => {
                self.toggle();
                KeyResult::Changed
            }
            Key::Char('x') | Key::Char('y') if !self.checked => {
                self.checked = true;
                KeyResult::Changed
            }
            Key::Char('n') if self.checked => {
                self.checked = false;
                KeyResult::Changed
            }
            _ => KeyResult::Ignored,
        }
    }
}
