//! Widget backends: the factory contract and its implementations.
//!
//! A backend turns [`FieldSpec`]s into live widgets and reads/writes their
//! values through opaque [`WidgetHandle`]s. The form controller only talks to
//! the [`WidgetFactory`] trait, so any backend can drive any form.

pub mod coerce;
pub mod headless;
pub mod terminal;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use slotmap::new_key_type;

use crate::config::{FieldSpec, LayoutKind, WindowSpec};
use crate::error::{BackendError, FormError, UnsupportedFieldTypeError};

pub use headless::HeadlessBackend;
pub use terminal::TerminalBackend;

new_key_type! {
    /// Opaque reference to one widget created by a backend.
    pub struct WidgetHandle;
}

/// Interaction and display flags of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetState {
    pub enabled: bool,
    pub visible: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: true,
        }
    }
}

// ---------------------------------------------------------------------------
// FormShell
// ---------------------------------------------------------------------------

/// Backend-agnostic description of the window and arrangement of a form.
///
/// Built by the controller after every widget exists and handed to
/// [`WidgetFactory::mount`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormShell {
    pub window: WindowSpec,
    /// One section per tab, or a single untitled section.
    pub sections: Vec<Section>,
    /// Buttons in display order: custom buttons, then cancel, then submit.
    pub buttons: Vec<ButtonSlot>,
}

/// A group of widgets laid out together.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Tab title; `None` for a form without tabs.
    pub title: Option<String>,
    pub layout: LayoutKind,
    pub enabled: bool,
    pub tooltip: Option<String>,
    pub widgets: Vec<WidgetHandle>,
}

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ButtonRole {
    Submit,
    Cancel,
    /// A custom button, by name.
    Custom(String),
}

/// A button placed in the form's button bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonSlot {
    pub role: ButtonRole,
    pub label: String,
    pub tooltip: Option<String>,
    /// Declaration string, e.g. `color: white; background: green`.
    pub style: Option<String>,
    pub enabled: bool,
}

// ---------------------------------------------------------------------------
// WidgetFactory
// ---------------------------------------------------------------------------

/// The contract every backend implements.
///
/// Value operations only touch the addressed widget and are idempotent.
/// Handles a backend did not issue fail with [`FormError::UnknownWidget`].
pub trait WidgetFactory {
    /// Short backend name used in errors and logs.
    fn backend(&self) -> &'static str;

    /// Create one control for `field`, initialized to its default value.
    fn create_widget(&mut self, field: &FieldSpec) -> Result<WidgetHandle, UnsupportedFieldTypeError>;

    /// Current value, in the field's semantic type.
    fn get_value(&self, handle: WidgetHandle) -> Result<Value, FormError>;

    /// Write a value, clamping numbers into range. Uncoercible values leave
    /// the widget unchanged.
    fn set_value(&mut self, handle: WidgetHandle, value: &Value) -> Result<(), FormError>;

    fn set_enabled(&mut self, handle: WidgetHandle, enabled: bool) -> Result<(), FormError>;

    fn set_visible(&mut self, handle: WidgetHandle, visible: bool) -> Result<(), FormError>;

    fn widget_state(&self, handle: WidgetHandle) -> Result<WidgetState, FormError>;

    /// Receive the window and arrangement once all widgets exist.
    fn mount(&mut self, shell: &FormShell) {
        let _ = shell;
    }
}

impl<F: WidgetFactory + ?Sized> WidgetFactory for Box<F> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    fn create_widget(&mut self, field: &FieldSpec) -> Result<WidgetHandle, UnsupportedFieldTypeError> {
        (**self).create_widget(field)
    }

    fn get_value(&self, handle: WidgetHandle) -> Result<Value, FormError> {
        (**self).get_value(handle)
    }

    fn set_value(&mut self, handle: WidgetHandle, value: &Value) -> Result<(), FormError> {
        (**self).set_value(handle, value)
    }

    fn set_enabled(&mut self, handle: WidgetHandle, enabled: bool) -> Result<(), FormError> {
        (**self).set_enabled(handle, enabled)
    }

    fn set_visible(&mut self, handle: WidgetHandle, visible: bool) -> Result<(), FormError> {
        (**self).set_visible(handle, visible)
    }

    fn widget_state(&self, handle: WidgetHandle) -> Result<WidgetState, FormError> {
        (**self).widget_state(handle)
    }

    fn mount(&mut self, shell: &FormShell) {
        (**self).mount(shell)
    }
}

pub(crate) fn unknown(handle: WidgetHandle) -> FormError {
    FormError::UnknownWidget(format!("{handle:?}"))
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Which backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    /// Interactive terminal widgets.
    #[default]
    Terminal,
    /// In-memory widgets with no display.
    Headless,
}

impl BackendKind {
    /// Environment variable read by [`BackendKind::from_env`].
    pub const ENV_VAR: &'static str = "GUI_BACKEND";

    /// Backend named by `GUI_BACKEND`, or the default when unset.
    ///
    /// Meant for binaries; library code takes a `BackendKind` explicitly.
    pub fn from_env() -> Result<Self, BackendError> {
        match std::env::var(Self::ENV_VAR) {
            Ok(name) if !name.trim().is_empty() => name.parse(),
            _ => Ok(Self::default()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Terminal => "terminal",
            BackendKind::Headless => "headless",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" | "tui" => Ok(BackendKind::Terminal),
            "headless" | "none" => Ok(BackendKind::Headless),
            _ => Err(BackendError(s.to_owned())),
        }
    }
}

/// Construct a boxed backend of the given kind.
pub fn create(kind: BackendKind) -> Box<dyn WidgetFactory> {
    match kind {
        BackendKind::Terminal => Box::new(TerminalBackend::new()),
        BackendKind::Headless => Box::new(HeadlessBackend::new()),
    }
}
