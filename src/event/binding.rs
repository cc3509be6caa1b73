//! Key binding registry.
//!
//! [`KeyBindingRegistry`] maps key and modifier combinations to form-level
//! [`BindingAction`]s. Bindings are resolved before the focused control sees
//! the key.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

// ---------------------------------------------------------------------------
// BindingAction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingAction {
    Quit,
    Submit,
    Cancel,
    FocusNext,
    FocusPrevious,
    NextTab,
    PreviousTab,
    /// Press the custom button with this name.
    Press(String),
}

// ---------------------------------------------------------------------------
// KeyBindingRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), BindingAction>,
}

impl KeyBindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard form bindings:
    ///
    /// - `Ctrl+C` quit, `Ctrl+S` submit, `Esc` cancel
    /// - `Tab` / `BackTab` move focus
    /// - `Ctrl+Right` / `Ctrl+Left` switch tab
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Char('c'), Modifiers::CTRL, BindingAction::Quit);
        registry.bind(Key::Char('s'), Modifiers::CTRL, BindingAction::Submit);
        registry.bind(Key::Escape, Modifiers::NONE, BindingAction::Cancel);
        registry.bind(Key::Tab, Modifiers::NONE, BindingAction::FocusNext);
        registry.bind(Key::BackTab, Modifiers::NONE, BindingAction::FocusPrevious);
        registry.bind(Key::Right, Modifiers::CTRL, BindingAction::NextTab);
        registry.bind(Key::Left, Modifiers::CTRL, BindingAction::PreviousTab);
        registry
    }

    /// Register a binding, replacing any existing one for the same chord.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: BindingAction) {
        self.bindings.insert((key, modifiers), action);
    }

    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<BindingAction> {
        self.bindings.remove(&(key, modifiers))
    }

    pub fn resolve(&self, event: &KeyEvent) -> Option<&BindingAction> {
        self.bindings.get(&(event.code, event.modifiers))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
