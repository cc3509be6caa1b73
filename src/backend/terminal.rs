//! Interactive terminal backend.
//!
//! Each field becomes a [`FieldWidget`]: a caption plus one control from
//! [`crate::widgets`]. Date, time, datetime and color fields are free text
//! that is validated on every edit; the last valid value is what the form
//! reads, and leaving the control restores it.
//!
//! The backend does not own the terminal. [`TerminalBackend::handle_key`]
//! and [`TerminalBackend::render`] are driven by [`crate::app::FormApp`] (or
//! by tests) and report form-level actions back as [`FormAction`]s.

use serde_json::Value;
use tracing::{debug, trace};

use super::coerce;
use super::{unknown, ButtonRole, FormShell, WidgetFactory, WidgetHandle, WidgetState};
use crate::config::{FieldSpec, FieldType};
use crate::css::styles::Styles;
use crate::error::{FormError, UnsupportedFieldTypeError};
use crate::event::binding::{BindingAction, KeyBindingRegistry};
use crate::event::input::{Key, KeyEvent};
use crate::geometry::Region;
use crate::layout::LayoutItem;
use crate::render::compositor::Compositor;
use crate::render::strip::Strip;
use crate::screen::{FieldWidgets, Focusable, FormScreen};
use crate::widget::{KeyResult, Widget};
use crate::widgets::{Checkbox, Choice, ChoiceStyle, Label, NumberInput, Slider, TextInput};

/// Pixels per terminal column when converting width hints.
pub const CELL_WIDTH_PX: u32 = 8;
/// Pixels per terminal row when converting height hints.
pub const CELL_HEIGHT_PX: u32 = 20;
/// Rows of a text area without a height hint.
const TEXTAREA_ROWS: i32 = 4;

// ---------------------------------------------------------------------------
// FieldWidget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Control {
    Text(TextInput),
    /// Free text checked against the field type on every edit.
    Parsed {
        input: TextInput,
        committed: String,
    },
    Check(Checkbox),
    Choice(Choice),
    Number(NumberInput),
    Slider(Slider),
}

/// A field's caption and control.
#[derive(Debug, Clone)]
pub struct FieldWidget {
    field: FieldSpec,
    label: Label,
    control: Control,
    state: WidgetState,
}

impl FieldWidget {
    fn new(field: &FieldSpec) -> Self {
        let placeholder = field.placeholder.clone();
        let text = |multiline: Option<i32>, password: bool| {
            let mut input = TextInput::new().password(password);
            if let Some(rows) = multiline {
                input = input.multiline(rows);
            }
            if let Some(p) = &placeholder {
                input = input.with_placeholder(p.clone());
            }
            input
        };

        let control = match field.kind {
            FieldType::Text | FieldType::Email | FieldType::Url | FieldType::File => {
                Control::Text(text(None, false))
            }
            FieldType::Password => Control::Text(text(None, true)),
            FieldType::Textarea => {
                let rows = field
                    .height
                    .map_or(TEXTAREA_ROWS, |px| (px / CELL_HEIGHT_PX).max(2) as i32);
                Control::Text(text(Some(rows), false))
            }
            FieldType::Date | FieldType::Time | FieldType::Datetime | FieldType::Color => {
                let mut input = text(None, false);
                if placeholder.is_none() {
                    input = input.with_placeholder(format_hint(field.kind));
                }
                Control::Parsed {
                    input,
                    committed: String::new(),
                }
            }
            FieldType::Checkbox => Control::Check(Checkbox::new(false)),
            FieldType::Select => Control::Choice(Choice::new(field.options.clone(), ChoiceStyle::Dropdown)),
            FieldType::Radio => Control::Choice(Choice::new(field.options.clone(), ChoiceStyle::Radio)),
            FieldType::Range => {
                let (min, max) = coerce::integer_bounds(field);
                Control::Slider(Slider::new(min, max))
            }
            FieldType::Int | FieldType::Float | FieldType::Number => {
                if field.is_integer() {
                    let (min, max) = coerce::integer_bounds(field);
                    Control::Number(NumberInput::integer(min, max))
                } else {
                    let (min, max) = coerce::real_bounds(field);
                    Control::Number(NumberInput::real(min, max, field.float_format()))
                }
            }
        };

        let mut widget = Self {
            field: field.clone(),
            label: Label::new(field.label.clone()).required(field.required),
            control,
            state: WidgetState::default(),
        };
        widget.write(&coerce::initial_value(field));
        widget
    }

    pub fn field(&self) -> &FieldSpec {
        &self.field
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// Visible and enabled.
    pub fn is_interactive(&self) -> bool {
        self.state.visible && self.state.enabled
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.field.tooltip.as_deref()
    }

    /// Current value in the field's semantic type.
    pub fn value(&self) -> Value {
        match &self.control {
            Control::Text(input) => Value::String(input.value().to_owned()),
            Control::Parsed { committed, .. } => Value::String(committed.clone()),
            Control::Check(check) => Value::Bool(check.is_checked()),
            Control::Choice(choice) => choice
                .selected()
                .map_or(Value::Null, |s| Value::String(s.to_owned())),
            Control::Number(number) if number.is_integer() => Value::from(number.value() as i64),
            Control::Number(number) => coerce::real(number.value()),
            Control::Slider(slider) => Value::from(slider.value()),
        }
    }

    /// Coerce `value` and show it. Leaves the control unchanged on failure.
    fn set_value(&mut self, value: &Value) -> Result<(), String> {
        let stored = coerce::coerce(&self.field, value)?;
        self.write(&stored);
        Ok(())
    }

    /// Show an already coerced value.
    fn write(&mut self, stored: &Value) {
        match &mut self.control {
            Control::Text(input) => input.set_value(stored.as_str().unwrap_or_default()),
            Control::Parsed { input, committed } => {
                *committed = stored.as_str().unwrap_or_default().to_owned();
                input.set_value(committed.clone());
                input.set_invalid(false);
            }
            Control::Check(check) => check.set_checked(stored.as_bool().unwrap_or(false)),
            Control::Choice(choice) => {
                choice.select(stored.as_str());
            }
            Control::Number(number) => number.set_value(stored.as_f64().unwrap_or(0.0)),
            Control::Slider(slider) => slider.set_value(stored.as_i64().unwrap_or(0)),
        }
    }

    fn widget(&self) -> &dyn Widget {
        match &self.control {
            Control::Text(w) | Control::Parsed { input: w, .. } => w,
            Control::Check(w) => w,
            Control::Choice(w) => w,
            Control::Number(w) => w,
            Control::Slider(w) => w,
        }
    }

    fn widget_mut(&mut self) -> &mut dyn Widget {
        match &mut self.control {
            Control::Text(w) | Control::Parsed { input: w, .. } => w,
            Control::Check(w) => w,
            Control::Choice(w) => w,
            Control::Number(w) => w,
            Control::Slider(w) => w,
        }
    }

    pub(crate) fn set_focus(&mut self, focused: bool) {
        self.widget_mut().set_focus(focused);
        if !focused {
            // Abandon an invalid edit.
            if let Control::Parsed { input, committed } = &mut self.control {
                input.set_value(committed.clone());
                input.set_invalid(false);
            }
        }
    }

    pub(crate) fn handle_key(&mut self, key: &KeyEvent) -> KeyResult {
        if !self.is_interactive() {
            return KeyResult::Ignored;
        }
        match self.widget_mut().handle_key(key) {
            KeyResult::Changed => self.revalidate(),
            other => other,
        }
    }

    /// Insert pasted text into a text control.
    pub(crate) fn paste(&mut self, text: &str) -> KeyResult {
        if !self.is_interactive() {
            return KeyResult::Ignored;
        }
        match &mut self.control {
            Control::Text(input) | Control::Parsed { input, .. } => input.insert_str(text),
            _ => return KeyResult::Ignored,
        }
        self.revalidate()
    }

    /// Commit the text of a parsed control if it is valid.
    fn revalidate(&mut self) -> KeyResult {
        let Control::Parsed { input, committed } = &mut self.control else {
            return KeyResult::Changed;
        };
        match coerce::coerce(&self.field, &Value::String(input.value().to_owned())) {
            Ok(Value::String(value)) => {
                input.set_invalid(false);
                if *committed == value {
                    KeyResult::Consumed
                } else {
                    *committed = value;
                    KeyResult::Changed
                }
            }
            _ => {
                input.set_invalid(true);
                KeyResult::Consumed
            }
        }
    }

    pub(crate) fn layout_item(&self, width: i32) -> LayoutItem {
        LayoutItem::new(self.label.width(), self.widget().desired_height(width))
            .with_control_width(self.field.width.map(|px| (px / CELL_WIDTH_PX) as i32))
    }

    pub(crate) fn render(&self, label: Region, control: Region, dimmed: bool) -> Vec<Strip> {
        let styles = if dimmed || !self.state.enabled {
            Styles::new().with_flags(|f| f.dim = Some(true))
        } else {
            Styles::new()
        };
        let mut strips = self.label.render(label, &styles);
        strips.extend(self.widget().render(control, &styles));
        strips
    }
}

fn format_hint(kind: FieldType) -> &'static str {
    match kind {
        FieldType::Date => "YYYY-MM-DD",
        FieldType::Time => "HH:MM:SS",
        FieldType::Datetime => "YYYY-MM-DDTHH:MM:SS",
        _ => "#rrggbb",
    }
}

// ---------------------------------------------------------------------------
// TerminalBackend
// ---------------------------------------------------------------------------

/// What a key press asks the form to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// A button was activated, by key binding or by pressing it.
    Press(ButtonRole),
    /// The user edited a field.
    Changed(WidgetHandle),
    /// Leave without submitting or cancelling.
    Quit,
}

pub struct TerminalBackend {
    widgets: FieldWidgets,
    screen: Option<FormScreen>,
    bindings: KeyBindingRegistry,
}

impl TerminalBackend {
    pub fn new() -> Self {
        Self {
            widgets: FieldWidgets::with_key(),
            screen: None,
            bindings: KeyBindingRegistry::with_defaults(),
        }
    }

    pub fn screen(&self) -> Option<&FormScreen> {
        self.screen.as_ref()
    }

    /// The field that holds focus, if any.
    pub fn focused_widget(&self) -> Option<WidgetHandle> {
        match self.screen.as_ref()?.focused()? {
            Focusable::Field(handle) => Some(handle),
            Focusable::Button(_) => None,
        }
    }

    /// Focus `handle`, switching tabs if needed.
    pub fn focus_widget(&mut self, handle: WidgetHandle) -> bool {
        match self.screen.as_mut() {
            Some(screen) => screen.focus_field(handle, &mut self.widgets),
            None => false,
        }
    }

    pub fn select_section(&mut self, index: usize) -> bool {
        match self.screen.as_mut() {
            Some(screen) => screen.select_section(index, &mut self.widgets),
            None => false,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        if let Some(screen) = self.screen.as_mut() {
            screen.set_status(message);
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        if let Some(screen) = self.screen.as_mut() {
            screen.set_error(message);
        }
    }

    /// Route a key: bindings first, then the focused control, then
    /// navigation fallbacks.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormAction> {
        let screen = self.screen.as_mut()?;

        if let Some(action) = self.bindings.resolve(&key).cloned() {
            trace!(?action, "binding");
            return match action {
                BindingAction::Quit => Some(FormAction::Quit),
                BindingAction::Submit => screen
                    .has_button(&ButtonRole::Submit)
                    .then_some(FormAction::Press(ButtonRole::Submit)),
                BindingAction::Cancel => Some(if screen.has_button(&ButtonRole::Cancel) {
                    FormAction::Press(ButtonRole::Cancel)
                } else {
                    FormAction::Quit
                }),
                BindingAction::FocusNext => {
                    screen.focus_next(&mut self.widgets);
                    None
                }
                BindingAction::FocusPrevious => {
                    screen.focus_previous(&mut self.widgets);
                    None
                }
                BindingAction::NextTab => {
                    screen.cycle_section(true, &mut self.widgets);
                    None
                }
                BindingAction::PreviousTab => {
                    screen.cycle_section(false, &mut self.widgets);
                    None
                }
                BindingAction::Press(name) => {
                    let role = ButtonRole::Custom(name);
                    screen.has_button(&role).then_some(FormAction::Press(role))
                }
            };
        }

        match screen.focused() {
            Some(Focusable::Field(handle)) => {
                if let Some(widget) = self.widgets.get_mut(handle) {
                    match widget.handle_key(&key) {
                        KeyResult::Changed => return Some(FormAction::Changed(handle)),
                        KeyResult::Consumed => return None,
                        KeyResult::Ignored => {}
                    }
                }
            }
            Some(Focusable::Button(index)) => {
                if matches!(key.code, Key::Enter | Key::Char(' ')) {
                    return screen.button_role(index).cloned().map(FormAction::Press);
                }
            }
            None => {}
        }

        match key.code {
            Key::Down | Key::Enter => screen.focus_next(&mut self.widgets),
            Key::Up => screen.focus_previous(&mut self.widgets),
            Key::PageDown => screen.scroll_by(5),
            Key::PageUp => screen.scroll_by(-5),
            _ => {}
        }
        None
    }

    /// Paste into the focused text control.
    pub fn paste(&mut self, text: &str) -> Option<FormAction> {
        let handle = self.focused_widget()?;
        match self.widgets.get_mut(handle)?.paste(text) {
            KeyResult::Changed => Some(FormAction::Changed(handle)),
            _ => None,
        }
    }

    /// Draw the mounted form into a `width` x `height` buffer.
    pub fn render(&mut self, width: u16, height: u16) -> Option<&Compositor> {
        let screen = self.screen.as_mut()?;
        Some(screen.render(&self.widgets, width, height))
    }

    fn widget_mut(&mut self, handle: WidgetHandle) -> Result<&mut FieldWidget, FormError> {
        self.widgets.get_mut(handle).ok_or_else(|| unknown(handle))
    }

    fn refresh_focus(&mut self) {
        if let Some(screen) = self.screen.as_mut() {
            screen.refresh_focus(&mut self.widgets);
        }
    }
}

impl Default for TerminalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetFactory for TerminalBackend {
    fn backend(&self) -> &'static str {
        "terminal"
    }

    fn create_widget(&mut self, field: &FieldSpec) -> Result<WidgetHandle, UnsupportedFieldTypeError> {
        let widget = FieldWidget::new(field);
        trace!(field = %field.name, control = widget.widget().widget_type(), "terminal widget created");
        Ok(self.widgets.insert(widget))
    }

    fn get_value(&self, handle: WidgetHandle) -> Result<Value, FormError> {
        self.widgets
            .get(handle)
            .map(FieldWidget::value)
            .ok_or_else(|| unknown(handle))
    }

    fn set_value(&mut self, handle: WidgetHandle, value: &Value) -> Result<(), FormError> {
        let widget = self.widget_mut(handle)?;
        widget
            .set_value(value)
            .map_err(|reason| FormError::invalid(&widget.field.name, reason))
    }

    fn set_enabled(&mut self, handle: WidgetHandle, enabled: bool) -> Result<(), FormError> {
        self.widget_mut(handle)?.state.enabled = enabled;
        self.refresh_focus();
        Ok(())
    }

    fn set_visible(&mut self, handle: WidgetHandle, visible: bool) -> Result<(), FormError> {
        self.widget_mut(handle)?.state.visible = visible;
        self.refresh_focus();
        Ok(())
    }

    fn widget_state(&self, handle: WidgetHandle) -> Result<WidgetState, FormError> {
        self.widgets
            .get(handle)
            .map(FieldWidget::state)
            .ok_or_else(|| unknown(handle))
    }

    fn mount(&mut self, shell: &FormShell) {
        debug!(
            sections = shell.sections.len(),
            buttons = shell.buttons.len(),
            "terminal form mounted"
        );
        self.screen = Some(FormScreen::new(shell, &mut self.widgets));
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_from_value;
    use crate::controller::FormController;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn form(config: Value) -> FormController<TerminalBackend> {
        let config = load_from_value(&config).unwrap();
        FormController::with_config(TerminalBackend::new(), config).unwrap()
    }

    fn key(code: Key) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn type_text(backend: &mut TerminalBackend, text: &str) {
        for ch in text.chars() {
            backend.handle_key(key(Key::Char(ch)));
        }
    }

    // ── Values ───────────────────────────────────────────────────────

    #[test]
    fn defaults_are_shown() {
        let controller = form(json!({"fields": [
            {"name": "n", "type": "int", "label": "N", "default_value": 4},
            {"name": "on", "type": "checkbox", "label": "On", "default_value": true},
            {"name": "size", "type": "select", "label": "Size", "options": ["S", "M"], "default_value": "M"},
            {"name": "pick", "type": "radio", "label": "Pick", "options": ["a", "b"]},
            {"name": "vol", "type": "range", "label": "Vol", "default_value": 30},
            {"name": "ratio", "type": "float", "label": "Ratio", "default_value": 0.25}
        ]}));
        let values = controller.values().unwrap();
        assert_eq!(values["n"], json!(4));
        assert_eq!(values["on"], json!(true));
        assert_eq!(values["size"], json!("M"));
        assert_eq!(values["pick"], Value::Null);
        assert_eq!(values["vol"], json!(30));
        assert_eq!(values["ratio"], json!(0.25));
    }

    #[test]
    fn rejected_value_leaves_control_unchanged() {
        let mut backend = TerminalBackend::new();
        let field = FieldSpec::new("size", FieldType::Select, "Size").with_options(["S", "M"]);
        let handle = backend.create_widget(&field).unwrap();
        let err = backend.set_value(handle, &json!("XL")).unwrap_err();
        assert!(matches!(err, FormError::InvalidValue { ref field, .. } if field == "size"));
        assert_eq!(backend.get_value(handle).unwrap(), json!("S"));
    }

    #[test]
    fn numbers_are_clamped() {
        let mut backend = TerminalBackend::new();
        let field = FieldSpec::new("n", FieldType::Int, "N").with_range(Some(0.0), Some(10.0));
        let handle = backend.create_widget(&field).unwrap();
        backend.set_value(handle, &json!(99)).unwrap();
        assert_eq!(backend.get_value(handle).unwrap(), json!(10));
    }

    // ── Keys ─────────────────────────────────────────────────────────

    #[test]
    fn typing_edits_the_focused_field() {
        let mut controller = form(json!({"fields": [
            {"name": "name", "type": "text", "label": "Name"},
            {"name": "age", "type": "int", "label": "Age"}
        ]}));
        let name = controller.handle("name").unwrap();
        let backend = controller.factory_mut();
        assert_eq!(backend.focused_widget(), Some(name));
        assert_eq!(backend.handle_key(key(Key::Char('A'))), Some(FormAction::Changed(name)));
        type_text(backend, "da");
        backend.handle_key(key(Key::Tab));
        backend.handle_key(key(Key::Up));
        assert_eq!(controller.field_value("name").unwrap(), json!("Ada"));
        assert_eq!(controller.field_value("age").unwrap(), json!(1));
    }

    #[test]
    fn invalid_date_keeps_last_valid_value() {
        let mut controller = form(json!({"fields": [
            {"name": "day", "type": "date", "label": "Day", "default_value": "2024-01-05"},
            {"name": "other", "type": "text", "label": "Other"}
        ]}));
        let day = controller.handle("day").unwrap();
        controller.factory_mut().handle_key(key(Key::Backspace));
        assert_eq!(controller.field_value("day").unwrap(), json!("2024-01-05"));

        assert_eq!(
            controller.factory_mut().handle_key(key(Key::Char('6'))),
            Some(FormAction::Changed(day))
        );
        assert_eq!(controller.field_value("day").unwrap(), json!("2024-01-06"));
    }

    #[test]
    fn bindings_map_to_actions() {
        let mut controller = form(json!({
            "cancel_button": false,
            "fields": [{"name": "t", "type": "text", "label": "T"}],
            "custom_buttons": [{"name": "reset", "label": "Reset"}]
        }));
        let backend = controller.factory_mut();
        assert_eq!(
            backend.handle_key(KeyEvent::ctrl(Key::Char('s'))),
            Some(FormAction::Press(ButtonRole::Submit))
        );
        assert_eq!(backend.handle_key(key(Key::Escape)), Some(FormAction::Quit));
        assert_eq!(backend.handle_key(KeyEvent::ctrl(Key::Char('c'))), Some(FormAction::Quit));

        // Tab to the custom button, then press it.
        backend.handle_key(key(Key::Tab));
        assert_eq!(
            backend.handle_key(key(Key::Enter)),
            Some(FormAction::Press(ButtonRole::Custom("reset".into())))
        );
    }

    #[test]
    fn hidden_fields_leave_the_focus_chain() {
        let mut controller = form(json!({"fields": [
            {"name": "a", "type": "text", "label": "A"},
            {"name": "b", "type": "text", "label": "B"}
        ]}));
        let b = controller.handle("b").unwrap();
        controller.show_field("a", false).unwrap();
        assert_eq!(controller.factory().focused_widget(), Some(b));
        controller.enable_field("b", false).unwrap();
        assert_eq!(controller.factory().focused_widget(), None);
    }

    #[test]
    fn unmounted_backend_ignores_keys() {
        let mut backend = TerminalBackend::new();
        assert_eq!(backend.handle_key(key(Key::Enter)), None);
        assert!(backend.render(10, 5).is_none());
    }

    #[test]
    fn paste_goes_to_text_controls() {
        let mut controller = form(json!({"fields": [
            {"name": "note", "type": "textarea", "label": "Note"}
        ]}));
        let note = controller.handle("note").unwrap();
        assert_eq!(
            controller.factory_mut().paste("line one\r\nline two"),
            Some(FormAction::Changed(note))
        );
        assert_eq!(controller.field_value("note").unwrap(), json!("line one\nline two"));
    }
}
