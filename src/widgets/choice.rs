//! Choice: pick one of a fixed list of options.
//!
//! A dropdown shows the current option as `< Medium >`; a radio list shows
//! every option as `(•) S  ( ) M`. A dropdown always has a selection; a radio
//! list may have none.

use crate::css::styles::Styles;
use crate::event::input::{Key, KeyEvent};
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::{KeyResult, Widget};

use super::center;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    Dropdown,
    Radio,
}

#[derive(Debug, Clone)]
pub struct Choice {
    options: Vec<String>,
    selected: Option<usize>,
    style: ChoiceStyle,
    focused: bool,
}

impl Choice {
    pub fn new(options: Vec<String>, style: ChoiceStyle) -> Self {
        let selected = match style {
            ChoiceStyle::Dropdown if !options.is_empty() => Some(0),
            _ => None,
        };
        Self {
            options,
            selected,
            style,
            focused: false,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    /// Select `option` by text, or clear a radio list with `None`. Returns
    /// false when the option is unknown.
    pub fn select(&mut self, option: Option<&str>) -> bool {
        match option {
            None if self.style == ChoiceStyle::Radio => {
                self.selected = None;
                true
            }
            None => false,
            Some(text) => match self.options.iter().position(|o| o == text) {
                Some(i) => {
                    self.selected = Some(i);
                    true
                }
                None => false,
            },
        }
    }

    fn step(&mut self, forward: bool) -> KeyResult {
        let len = self.options.len();
        if len == 0 {
            return KeyResult::Ignored;
        }
        let next = match (self.selected, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.selected = Some(next);
        KeyResult::Changed
    }

    fn jump(&mut self, index: usize) -> KeyResult {
        if self.options.is_empty() || self.selected == Some(index) {
            return KeyResult::Consumed;
        }
        self.selected = Some(index);
        KeyResult::Changed
    }
}

impl Widget for Choice {
    fn widget_type(&self) -> &str {
        match self.style {
            ChoiceStyle::Dropdown => "Select",
            ChoiceStyle::Radio => "Radio",
        }
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
        let highlight = if self.focused { base.clone().reverse() } else { base.clone() };
        let mut strip = Strip::new(region.y, region.x);

        match self.style {
            ChoiceStyle::Dropdown => {
                let inner = (region.width - 4).max(0) as usize;
                strip.push_str("< ", base.clone());
                strip.push_str(&center(self.selected().unwrap_or(""), inner), highlight);
                strip.push_str(" >", base.clone());
            }
            ChoiceStyle::Radio => {
                for (i, option) in self.options.iter().enumerate() {
                    if i > 0 {
                        strip.push_str("  ", base.clone());
                    }
                    let chosen = self.selected == Some(i);
                    let mark = if chosen { "(\u{2022}) " } else { "( ) " };
                    let style = if chosen { highlight.clone() } else { base.clone() };
                    strip.push_str(mark, style.clone());
                    strip.push_str(option, style);
                }
            }
        }
        strip.fill(region.width, base);
        vec![strip]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyResult {
        match key.code {
            Key::Right | Key::Char(' ') => self.step(true),
            Key::Left => self.step(false),
            Key::Home => self.jump(0),
            Key::End => self.jump(self.options.len().saturating_sub(1)),
            Key::Char(ch) if key.typed_char().is_some() => {
                // Jump to the next option starting with the typed letter.
                let ch = ch.to_ascii_lowercase();
                let len = self.options.len();
                let start = self.selected.map_or(0, |i| i + 1);
                (0..len)
                    .map(|k| (start + k) % len)
                    .find(|&i| {
                        self.options[i]
                            .chars()
                            .next()
                            .is_some_and(|c| c.to_ascii_lowercase() == ch)
                    })
                    .map_or(KeyResult::Consumed, |i| self.jump(i))
            }
            _ => KeyResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::strips_to_string;

    fn sizes(style: ChoiceStyle) -> Choice {
        Choice::new(vec!["Small".into(), "Medium".into(), "Large".into()], style)
    }

    fn render(choice: &Choice, width: i32) -> String {
        strips_to_string(&choice.render(Region::new(0, 0, width, 1), &Styles::new()), width, 1)
    }

    #[test]
    fn dropdown_starts_on_first_option() {
        let choice = sizes(ChoiceStyle::Dropdown);
        assert_eq!(choice.selected(), Some("Small"));
        assert_eq!(render(&choice, 12), "<  Small   >");
    }

    #[test]
    fn radio_starts_empty_and_can_be_cleared() {
        let mut choice = sizes(ChoiceStyle::Radio);
        assert_eq!(choice.selected(), None);
        assert!(choice.select(Some("Large")));
        assert_eq!(render(&choice, 40), "( ) Small  ( ) Medium  (•) Large");
        assert!(choice.select(None));
        assert_eq!(choice.selected(), None);
        assert!(!sizes(ChoiceStyle::Dropdown).select(None));
    }

    #[test]
    fn arrows_cycle() {
        let mut choice = sizes(ChoiceStyle::Dropdown);
        choice.handle_key(&KeyEvent::plain(Key::Left));
        assert_eq!(choice.selected(), Some("Large"));
        choice.handle_key(&KeyEvent::plain(Key::Right));
        assert_eq!(choice.selected(), Some("Small"));
        assert_eq!(choice.handle_key(&KeyEvent::plain(Key::Home)), KeyResult::Consumed);
        assert_eq!(choice.handle_key(&KeyEvent::plain(Key::Up)), KeyResult::Ignored);
    }

    #[test]
    fn typing_jumps_by_first_letter() {
        let mut choice = sizes(ChoiceStyle::Radio);
        assert_eq!(choice.handle_key(&KeyEvent::plain(Key::Char('m'))), KeyResult::Changed);
        assert_eq!(choice.selected(), Some("Medium"));
        assert_eq!(choice.handle_key(&KeyEvent::plain(Key::Char('z'))), KeyResult::Consumed);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut choice = sizes(ChoiceStyle::Dropdown);
        assert!(!choice.select(Some("Huge")));
        assert_eq!(choice.selected(), Some("Small"));
    }
}
