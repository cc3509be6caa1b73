//! Pilot: scripted input for a headless [`FormApp`].

use serde_json::Value;

use crate::app::{AppConfig, FormApp, FormResult};
use crate::backend::TerminalBackend;
use crate::config::{load_from_value, FormConfig};
use crate::controller::FormController;
use crate::error::FormError;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers};

use super::snapshot::compositor_to_string;

// ---------------------------------------------------------------------------
// FormPilot
// ---------------------------------------------------------------------------

/// Drives a form the way a user at the keyboard would.
///
/// ```
/// use gilt_forms::event::Key;
/// use gilt_forms::testing::FormPilot;
/// use serde_json::json;
///
/// let mut pilot = FormPilot::from_json(
///     &json!({"fields": [{"name": "user", "type": "text", "label": "User"}]}),
///     40,
///     10,
/// )
/// .unwrap();
/// pilot.type_text("ada").unwrap();
/// assert_eq!(pilot.controller().field_value("user").unwrap(), json!("ada"));
/// ```
pub struct FormPilot {
    app: FormApp,
}

impl FormPilot {
    /// Build `form` on a terminal backend of `width` x `height` cells.
    pub fn new(form: FormConfig, width: u16, height: u16) -> Result<Self, FormError> {
        Ok(Self {
            app: FormApp::new_headless(form, width, height)?,
        })
    }

    /// Load a configuration document and build it.
    pub fn from_json(config: &Value, width: u16, height: u16) -> Result<Self, FormError> {
        Self::new(load_from_value(config)?, width, height)
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.app = self.app.with_config(config);
        self
    }

    // ── Input simulation ─────────────────────────────────────────────

    pub fn press_key(&mut self, key: Key) -> Result<(), FormError> {
        self.press_key_with(key, Modifiers::NONE)
    }

    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> Result<(), FormError> {
        self.app
            .handle_input(InputEvent::Key(KeyEvent::new(key, modifiers)))
    }

    /// Send each character of `text` as its own key press.
    pub fn type_text(&mut self, text: &str) -> Result<(), FormError> {
        text.chars().try_for_each(|ch| self.press_key(Key::Char(ch)))
    }

    pub fn paste(&mut self, text: &str) -> Result<(), FormError> {
        self.app.handle_input(InputEvent::Paste(text.to_owned()))
    }

    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), FormError> {
        self.app.handle_input(InputEvent::Resize { width, height })
    }

    /// Ctrl+S.
    pub fn submit(&mut self) -> Result<(), FormError> {
        self.press_key_with(Key::Char('s'), Modifiers::CTRL)
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// The current frame as text, one line per row.
    pub fn render(&mut self) -> String {
        self.app
            .render()
            .map(compositor_to_string)
            .unwrap_or_default()
    }

    /// Text of row `y` of the current frame.
    pub fn row(&mut self, y: u16) -> String {
        self.app
            .render()
            .map(|frame| frame.row_text(y))
            .unwrap_or_default()
    }

    pub fn controller(&self) -> &FormController<TerminalBackend> {
        self.app.controller()
    }

    pub fn controller_mut(&mut self) -> &mut FormController<TerminalBackend> {
        self.app.controller_mut()
    }

    /// Name of the field holding keyboard focus, if any.
    pub fn focused_field(&self) -> Option<&str> {
        let controller = self.app.controller();
        let handle = controller.factory().focused_widget()?;
        controller.field_for(handle).map(|f| f.name.as_str())
    }

    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }

    pub fn result(&self) -> Option<&FormResult> {
        self.app.result()
    }

    pub fn app(&self) -> &FormApp {
        &self.app
    }
}

// ===========================================================================
// Tests
// ===========================================================================
