//! Input event types decoupled from crossterm.
//!
//! Crossterm events convert into [`InputEvent`] so widgets and bindings never
//! touch crossterm types directly.

use std::ops::BitOr;

use crossterm::event as ct;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    pub fn ctrl(code: Key) -> Self {
        Self::new(code, Modifiers::CTRL)
    }

    /// A typed character, ignoring Shift. `None` for control chords.
    pub fn typed_char(&self) -> Option<char> {
        match self.code {
            Key::Char(ch)
                if !self.modifiers.contains(Modifiers::CTRL)
                    && !self.modifiers.contains(Modifiers::ALT) =>
            {
                Some(ch)
            }
            _ => None,
        }
    }
}

impl From<Key> for KeyEvent {
    fn from(code: Key) -> Self {
        KeyEvent::plain(code)
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Paste(String),
}

impl InputEvent {
    /// Convert a crossterm event. Key releases, mouse and focus events and
    /// keys without a counterpart yield `None`.
    pub fn from_crossterm(event: ct::Event) -> Option<Self> {
        match event {
            ct::Event::Key(key) if key.kind != ct::KeyEventKind::Release => {
                convert_key(key).map(InputEvent::Key)
            }
            ct::Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            ct::Event::Paste(text) => Some(InputEvent::Paste(text)),
            _ => None,
        }
    }
}

fn convert_modifiers(m: ct::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(ct::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(ct::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(ct::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key(key: ct::KeyEvent) -> Option<KeyEvent> {
    let code = match key.code {
        ct::KeyCode::Char(c) => Key::Char(c),
        ct::KeyCode::Enter => Key::Enter,
        ct::KeyCode::Esc => Key::Escape,
        ct::KeyCode::Tab => Key::Tab,
        ct::KeyCode::BackTab => Key::BackTab,
        ct::KeyCode::Backspace => Key::Backspace,
        ct::KeyCode::Delete => Key::Delete,
        ct::KeyCode::Left => Key::Left,
        ct::KeyCode::Right => Key::Right,
        ct::KeyCode::Up => Key::Up,
        ct::KeyCode::Down => Key::Down,
        ct::KeyCode::Home => Key::Home,
        ct::KeyCode::End => Key::End,
        ct::KeyCode::PageUp => Key::PageUp,
        ct::KeyCode::PageDown => Key::PageDown,
        ct::KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    let mut modifiers = convert_modifiers(key.modifiers);
    // Shift is already folded into BackTab.
    if code == Key::BackTab {
        modifiers = Modifiers(modifiers.0 & !Modifiers::SHIFT.0);
    }
    Some(KeyEvent::new(code, modifiers))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ct_key(code: ct::KeyCode, modifiers: ct::KeyModifiers) -> ct::Event {
        ct::Event::Key(ct::KeyEvent::new(code, modifiers))
    }

    #[test]
    fn modifiers_combine() {
        let m = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(m.contains(Modifiers::CTRL));
        assert!(!m.contains(Modifiers::ALT));
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn typed_char_ignores_control_chords() {
        assert_eq!(KeyEvent::plain(Key::Char('a')).typed_char(), Some('a'));
        assert_eq!(
            KeyEvent::new(Key::Char('A'), Modifiers::SHIFT).typed_char(),
            Some('A')
        );
        assert_eq!(KeyEvent::ctrl(Key::Char('s')).typed_char(), None);
        assert_eq!(KeyEvent::plain(Key::Enter).typed_char(), None);
    }

    #[test]
    fn converts_crossterm_keys() {
        let event = InputEvent::from_crossterm(ct_key(
            ct::KeyCode::Char('s'),
            ct::KeyModifiers::CONTROL,
        ));
        assert_eq!(event, Some(InputEvent::Key(KeyEvent::ctrl(Key::Char('s')))));

        let event = InputEvent::from_crossterm(ct_key(ct::KeyCode::BackTab, ct::KeyModifiers::SHIFT));
        assert_eq!(event, Some(InputEvent::Key(KeyEvent::plain(Key::BackTab))));
    }

    #[test]
    fn unsupported_events_are_dropped() {
        assert_eq!(
            InputEvent::from_crossterm(ct_key(ct::KeyCode::CapsLock, ct::KeyModifiers::NONE)),
            None
        );
        assert_eq!(InputEvent::from_crossterm(ct::Event::FocusGained), None);
        assert_eq!(
            InputEvent::from_crossterm(ct::Event::Resize(100, 30)),
            Some(InputEvent::Resize {
                width: 100,
                height: 30
            })
        );
    }
}
