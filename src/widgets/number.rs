//! NumberInput: a bounded integer or real spinner.
//!
//! Up/Down step the value; typing edits a text buffer that is committed
//! whenever it parses to a number inside the bounds. Out-of-range or
//! unparsable text is shown in red and leaves the last committed value.

use crate::css::styles::Styles;
use crate::event::input::{Key, KeyEvent};
use crate::format::{FloatFormat, FloatStyle};
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::{KeyResult, Widget};

/// Multiplier applied to the step by PageUp/PageDown.
const PAGE: f64 = 10.0;

// ---------------------------------------------------------------------------
// NumberInput
// ---------------------------------------------------------------------------

/// A numeric spinner with a free-text edit buffer.
#[derive(Debug, Clone)]
pub struct NumberInput {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    integer: bool,
    format: FloatFormat,
    buffer: Option<String>,
    focused: bool,
}

impl NumberInput {
    /// An integer spinner over `[min, max]` stepping by one.
    pub fn integer(min: i64, max: i64) -> Self {
        Self {
            value: 0f64.clamp(min as f64, max as f64),
            min: min as f64,
            max: max as f64,
            step: 1.0,
            integer: true,
            format: FloatFormat::default(),
            buffer: None,
            focused: false,
        }
    }

    /// A real spinner over `[min, max]`; the step follows the format's
    /// decimals.
    pub fn real(min: f64, max: f64, format: FloatFormat) -> Self {
        Self {
            value: 0f64.clamp(min, max),
            min,
            max,
            step: format.step(),
            integer: false,
            format,
            buffer: None,
            focused: false,
        }
    }

    /// Builder: set the initial value (clamped).
    pub fn with_value(mut self, value: f64) -> Self {
        self.set_value(value);
        self
    }

    /// The last committed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether the spinner only holds whole numbers.
    pub fn is_integer(&self) -> bool {
        self.integer
    }

    /// The inclusive `(min, max)` bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Store `value` clamped into the bounds, discarding pending edits.
    pub fn set_value(&mut self, value: f64) {
        let value = if self.integer { value.round() } else { value };
        self.value = value.clamp(self.min, self.max);
        self.buffer = None;
    }

    /// Whether the pending edit fails to parse or lies out of range.
    pub fn is_invalid(&self) -> bool {
        self.buffer
            .as_deref()
            .is_some_and(|text| self.parse(text).is_none())
    }

    /// What the control shows: the pending edit, or the formatted value.
    pub fn display(&self) -> String {
        match &self.buffer {
            Some(text) => text.clone(),
            None if self.integer => format!("{}", self.value as i64),
            None => self.format.format(self.value).trim().to_owned(),
        }
    }

    fn parse(&self, text: &str) -> Option<f64> {
        let cleaned: String = text.chars().filter(|&c| c != ',').collect();
        let (number, percent) = match cleaned.strip_suffix('%') {
            Some(rest) => (rest, true),
            None => (cleaned.as_str(), self.format.style == FloatStyle::Percent && !self.integer),
        };
        let mut value: f64 = number.trim().parse().ok()?;
        if percent {
            value /= 100.0;
        }
        if !value.is_finite() || value < self.min || value > self.max {
            return None;
        }
        if self.integer && value.fract() != 0.0 {
            return None;
        }
        Some(value)
    }

    fn step_by(&mut self, steps: f64) -> KeyResult {
        let before = self.value;
        let next = self.value + steps * self.step;
        // Round to the step's grid to avoid accumulating float error.
        let decimals = if self.integer { 0 } else { self.format.decimals() as i32 };
        let scale = 10f64.powi(decimals);
        self.set_value((next * scale).round() / scale);
        if self.value == before {
            KeyResult::Consumed
        } else {
            KeyResult::Changed
        }
    }

    fn edit(&mut self, f: impl FnOnce(&mut String)) -> KeyResult {
        let mut text = self.buffer.take().unwrap_or_else(|| self.display());
        f(&mut text);
        let parsed = self.parse(&text);
        self.buffer = Some(text);
        match parsed {
            Some(value) if value != self.value => {
                self.value = value;
                KeyResult::Changed
            }
            _ => KeyResult::Consumed,
        }
    }

    fn accepts(&self, ch: char) -> bool {
        ch.is_ascii_digit()
            || matches!(ch, '-' | '+')
            || (!self.integer && matches!(ch, '.' | 'e' | 'E' | '%' | ','))
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

impl Widget for NumberInput {
    fn widget_type(&self) -> &str {
        "NumberInput"
    }

    fn can_focus(&self) -> bool {
        true
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.buffer = None;
        }
    }

    fn render(&self, region: Region, styles: &Styles) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }
        let mut base = CellStyle::from_styles(styles);
        if self.is_invalid() {
            base = base.fg("red");
        }
        let inner = (region.width - 3).max(0) as usize;
        let text: String = self.display().chars().take(inner).collect();
        let pad = inner - text.chars().count();

        let mut strip = Strip::new(region.y, region.x);
        strip.push('[', base.clone());
        strip.push_str(&" ".repeat(pad), base.clone());
        let value_style = if self.focused { base.clone().underline() } else { base.clone() };
        strip.push_str(&text, value_style);
        strip.push(']', base.clone());
        strip.push('\u{2195}', base.clone().dim());
        strip.fill(region.width, base);
        vec![strip]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyResult {
        match key.code {
            Key::Up => self.step_by(1.0),
            Key::Down => self.step_by(-1.0),
            Key::PageUp => self.step_by(PAGE),
            Key::PageDown => self.step_by(-PAGE),
            Key::Home => self.step_by((self.min - self.value) / self.step),
            Key::End => self.step_by((self.max - self.value) / self.step),
            Key::Backspace => self.edit(|text| {
                text.pop();
            }),
            Key::Char(_) => match key.typed_char() {
                Some(ch) if self.accepts(ch) => self.edit(|text| text.push(ch)),
                _ => KeyResult::Ignored,
            },
            _ => KeyResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::strips_to_string;

    fn render(input: &NumberInput, width: i32) -> String {
        strips_to_string(&input.render(Region::new(0, 0, width, 1), &Styles::new()), width, 1)
    }

    fn typed(ch: char) -> KeyEvent {
        KeyEvent::plain(Key::Char(ch))
    }

    #[test]
    fn arrows_step_and_clamp() {
        let mut age = NumberInput::integer(0, 3).with_value(2.0);
        assert_eq!(age.handle_key(&KeyEvent::plain(Key::Up)), KeyResult::Changed);
        assert_eq!(age.value(), 3.0);
        assert_eq!(age.handle_key(&KeyEvent::plain(Key::Up)), KeyResult::Consumed);
        assert_eq!(age.handle_key(&KeyEvent::plain(Key::PageDown)), KeyResult::Changed);
        assert_eq!(age.value(), 0.0);
    }

    #[test]
    fn real_step_follows_format() {
        let format = FloatFormat::parse(".1f").unwrap();
        let mut price = NumberInput::real(0.0, 10.0, format).with_value(1.0);
        price.handle_key(&KeyEvent::plain(Key::Up));
        price.handle_key(&KeyEvent::plain(Key::Up));
        price.handle_key(&KeyEvent::plain(Key::Up));
        assert_eq!(price.value(), 1.3);
        assert_eq!(price.display(), "1.3");
    }

    #[test]
    fn typing_commits_valid_text() {
        let mut qty = NumberInput::integer(0, 100);
        qty.set_focus(true);
        qty.handle_key(&KeyEvent::plain(Key::Backspace));
        assert_eq!(qty.handle_key(&typed('4')), KeyResult::Changed);
        assert_eq!(qty.handle_key(&typed('2')), KeyResult::Changed);
        assert_eq!(qty.value(), 42.0);
        assert_eq!(qty.handle_key(&typed('.')), KeyResult::Ignored);
    }

    #[test]
    fn out_of_range_text_keeps_last_value() {
        let mut qty = NumberInput::integer(0, 100).with_value(50.0);
        qty.set_focus(true);
        assert_eq!(qty.handle_key(&typed('0')), KeyResult::Consumed);
        assert!(qty.is_invalid());
        assert_eq!(qty.value(), 50.0);
        assert_eq!(qty.display(), "500");

        qty.set_focus(false);
        assert!(!qty.is_invalid());
        assert_eq!(qty.display(), "50");
    }

    #[test]
    fn percent_text_is_scaled() {
        let format = FloatFormat::parse(".0%").unwrap();
        let mut ratio = NumberInput::real(0.0, 1.0, format).with_value(0.5);
        assert_eq!(ratio.display(), "50%");
        ratio.handle_key(&KeyEvent::plain(Key::Backspace));
        ratio.handle_key(&KeyEvent::plain(Key::Backspace));
        ratio.handle_key(&KeyEvent::plain(Key::Backspace));
        ratio.handle_key(&typed('2'));
        ratio.handle_key(&typed('5'));
        assert_eq!(ratio.value(), 0.25);
    }

    #[test]
    fn renders_right_aligned() {
        let qty = NumberInput::integer(0, 100).with_value(7.0);
        assert_eq!(render(&qty, 8), "[    7]↕");
    }
}
