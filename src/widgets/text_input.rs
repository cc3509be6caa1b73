//! TextInput: a focusable single- or multi-line text editor.
//!
//! The cursor is a byte offset into the value and always sits on a char
//! boundary. Rendered as `[text   ]`; placeholder text is dim, password
//! values are masked.

use crate::css::styles::Styles;
use crate::event::input::{Key, KeyEvent};
use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::{KeyResult, Widget};

const MASK: char = '\u{2022}';

// ---------------------------------------------------------------------------
// TextInput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    placeholder: String,
    cursor: usize,
    password: bool,
    /// Rows for a multi-line editor; `None` for a single line.
    rows: Option<i32>,
    focused: bool,
    invalid: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    pub fn password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    /// Make the editor multi-line with the given visible rows.
    pub fn multiline(mut self, rows: i32) -> Self {
        self.rows = Some(rows.max(1));
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        if self.rows.is_none() {
            self.value.retain(|c| c != '\n');
        }
        self.cursor = self.value.len();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_multiline(&self) -> bool {
        self.rows.is_some()
    }

    /// Mark the text as not matching its expected format.
    pub fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    // ── Editing ──────────────────────────────────────────────────────

    pub fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Insert pasted text; newlines are dropped in single-line mode.
    pub fn insert_str(&mut self, text: &str) {
        let text: String = if self.is_multiline() {
            text.replace("\r\n", "\n")
        } else {
            text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
        };
        self.value.insert_str(self.cursor, &text);
        self.cursor += text.len();
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.value.len() {
            return false;
        }
        let next = self.next_boundary();
        self.value.drain(self.cursor..next);
        true
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    // ── Lines ────────────────────────────────────────────────────────

    /// Cursor as (line, column in chars).
    fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.value[..self.cursor];
        let line = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map_or(0, |tail| tail.chars().count());
        (line, col)
    }

    /// Move to `col` (clamped) on `line`.
    fn move_to(&mut self, line: usize, col: usize) {
        let mut offset = 0;
        for (i, text) in self.value.split('\n').enumerate() {
            if i == line {
                let byte = text
                    .char_indices()
                    .nth(col)
                    .map_or(text.len(), |(b, _)| b);
                self.cursor = offset + byte;
                return;
            }
            offset += text.len() + 1;
        }
    }

    fn move_vertical(&mut self, down: bool) -> bool {
        let (line, col) = self.cursor_line_col();
        let lines = self.value.split('\n').count();
        match (down, line) {
            (false, 0) => false,
            (false, _) => {
                self.move_to(line - 1, col);
                true
            }
            (true, l) if l + 1 >= lines => false,
            (true, _) => {
                self.move_to(line + 1, col);
                true
            }
        }
    }

    fn display(&self, text: &str) -> String {
        if self.password {
            text.chars().map(|_| MASK).collect()
        } else {
            text.to_owned()
        }
    }

    fn render_line(&self, y: i32, x: i32, width: i32, line: &str, cursor_col: Option<usize>, base: &CellStyle) -> Strip {
        let inner = (width - 2).max(0) as usize;
        let mut strip = Strip::new(y, x);
        strip.push('[', base.clone());

        let chars: Vec<char> = line.chars().collect();
        let start = cursor_col.map_or(0, |c| (c + 1).saturating_sub(inner));
        for i in 0..inner {
            let ch = chars.get(start + i).copied().unwrap_or(' ');
            let style = if self.focused && cursor_col == Some(start + i) {
                base.clone().reverse()
            } else {
                base.clone()
            };
            strip.push(ch, style);
        }
        strip.push(']', base.clone());
        strip.fill(width, base.clone());
        strip
    }
}

impl Widget for TextInput {
    fn widget_type(&self) -> &str {
        "TextInput"
    }

    fn can_focus(&self) -> bool {
        true
    }

    fn desired_height(&self, _width: i32) -> i32 {
        self.rows.unwrap_or(1)
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn render(&self, region: Region, styles: &Styles) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }
        let mut base = CellStyle::from_styles(styles);
        if self.invalid {
            base = base.fg("red");
        }

        if self.value.is_empty() && !self.placeholder.is_empty() && !self.focused {
            let mut strips = vec![self.render_line(region.y, region.x, region.width, &self.placeholder, None, &base)];
            for cell in strips[0].cells.iter_mut().skip(1) {
                cell.style.dim = true;
            }
            for row in 1..region.height.min(self.desired_height(region.width)) {
                strips.push(self.render_line(region.y + row, region.x, region.width, "", None, &base));
            }
            return strips;
        }

        let shown = self.display(&self.value);
        let (cursor_line, cursor_col) = self.cursor_line_col();
        let rows = region.height.min(self.desired_height(region.width)).max(1) as usize;
        let first = (cursor_line + 1).saturating_sub(rows);
        let lines: Vec<&str> = shown.split('\n').collect();

        (0..rows)
            .map(|row| {
                let index = first + row;
                let line = lines.get(index).copied().unwrap_or("");
                let col = (index == cursor_line).then_some(cursor_col);
                self.render_line(region.y + row as i32, region.x, region.width, line, col, &base)
            })
            .collect()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyResult {
        if let Some(ch) = key.typed_char() {
            self.insert_char(ch);
            return KeyResult::Changed;
        }
        let changed = |done: bool| if done { KeyResult::Changed } else { KeyResult::Consumed };
        match key.code {
            Key::Backspace => changed(self.delete_back()),
            Key::Delete => changed(self.delete_forward()),
            Key::Left => {
                self.cursor = self.prev_boundary();
                KeyResult::Consumed
            }
            Key::Right => {
                self.cursor = self.next_boundary();
                KeyResult::Consumed
            }
            Key::Home => {
                let (line, _) = self.cursor_line_col();
                self.move_to(line, 0);
                KeyResult::Consumed
            }
            Key::End => {
                let (line, _) = self.cursor_line_col();
                self.move_to(line, usize::MAX);
                KeyResult::Consumed
            }
            Key::Enter if self.is_multiline() => {
                self.insert_char('\n');
                KeyResult::Changed
            }
            Key::Up | Key::Down if self.is_multiline() => {
                if self.move_vertical(key.code == Key::Down) {
                    KeyResult::Consumed
                } else {
                    KeyResult::Ignored
                }
            }
            _ => KeyResult::Ignored,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
