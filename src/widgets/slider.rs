//! Slider: an integer range shown as a bar with its value.

use crate::css::styles::Styles;
use crate::event::input::{Key, KeyEvent};
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::{KeyResult, Widget};

const FILLED: char = '\u{2588}';
const TRACK: char = '\u{2500}';

// ---------------------------------------------------------------------------
// Slider
// ---------------------------------------------------------------------------

/// A bounded integer picked with the arrow keys.
#[derive(Debug, Clone)]
pub struct Slider {
    value: i64,
    min: i64,
    max: i64,
    focused: bool,
}

impl Slider {
    /// Create a slider over `min..=max`, starting at `min`.
    pub fn new(min: i64, max: i64) -> Self {
        let max = max.max(min);
        Self {
            value: min,
            min,
            max,
            focused: false,
        }
    }

    /// Builder: set the initial value (clamped).
    pub fn with_value(mut self, value: i64) -> Self {
        self.set_value(value);
        self
    }

    /// The current value.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Set the value, clamped to the bounds.
    pub fn set_value(&mut self, value: i64) {
        self.value = value.clamp(self.min, self.max);
    }

    fn nudge(&mut self, delta: i64) -> KeyResult {
        self.jump(self.value.saturating_add(delta))
    }

    fn jump(&mut self, target: i64) -> KeyResult {
        let before = self.value;
        self.set_value(target);
        if self.value == before {
            KeyResult::Consumed
        } else {
            KeyResult::Changed
        }
    }

    /// Filled cells out of `track` for the current value.
    fn filled(&self, track: usize) -> usize {
        // i128 keeps full-width i64 bounds from overflowing.
        let span = i128::from(self.max) - i128::from(self.min);
        if span <= 0 {
            return track;
        }
        let offset = i128::from(self.value) - i128::from(self.min);
        ((offset as f64 / span as f64) * track as f64).round() as usize
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

impl Widget for Slider {
    fn widget_type(&self) -> &str {
        "Slider"
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
        let label = format!(" {}", self.value);
        let digits = self.min.to_string().len().max(self.max.to_string().len()) + 1;
        let track = (region.width as usize).saturating_sub(digits);
        let filled = self.filled(track);

        let bar = if self.focused { base.clone().bold() } else { base.clone() };
        let mut strip = Strip::new(region.y, region.x);
        for i in 0..track {
            let ch = if i < filled { FILLED } else { TRACK };
            strip.push(ch, if i < filled { bar.clone() } else { base.clone().dim() });
        }
        strip.push_str(&label, base.clone());
        strip.fill(region.width, base);
        vec![strip]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyResult {
        match key.code {
            Key::Right | Key::Up => self.nudge(1),
            Key::Left | Key::Down => self.nudge(-1),
            Key::PageUp => self.nudge(10),
            Key::PageDown => self.nudge(-10),
            Key::Home => self.jump(self.min),
            Key::End => self.jump(self.max),
            _ => KeyResult::Ignored,
        }
    }
}
