//! Form controller: builds widgets from a configuration and drives the form.
//!
//! The controller owns the [`FormConfig`] and a [`WidgetFactory`]. It creates
//! one widget per field in declaration order, collects values into nested
//! data, applies data back into widgets, and dispatches submit, cancel and
//! custom-button callbacks.
//!
//! Lifecycle: `Unbuilt -> Built -> (Submitted | Cancelled) -> Built`. The
//! submitted and cancelled states last while their callback runs. A build
//! that fails part way ends in `Failed`, which accepts no further builds.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::coerce;
use crate::backend::{
    ButtonRole, ButtonSlot, FormShell, Section, WidgetFactory, WidgetHandle, WidgetState,
};
use crate::codec::{self, FormData};
use crate::config::{ButtonSpec, FieldSpec, FormConfig};
use crate::data::{self, Metadata};
use crate::error::{CallbackError, FormError, ValidationError};

/// Title of the section holding fields that no tab references.
pub const UNTABBED_SECTION: &str = "Other";

pub type SubmitCallback = Box<dyn FnMut(&FormData) -> Result<(), CallbackError>>;
pub type CancelCallback = Box<dyn FnMut() -> Result<(), CallbackError>>;
/// Receives the pressed button and the result of collecting the form.
pub type ButtonCallback =
    Box<dyn FnMut(&ButtonSpec, Result<FormData, ValidationError>) -> Result<(), CallbackError>>;
/// Receives the field name and its new value.
pub type ChangeCallback = Box<dyn FnMut(&str, &Value)>;

// ---------------------------------------------------------------------------
// FormState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Unbuilt,
    Built,
    /// The submit callback is running.
    Submitted,
    /// The cancel callback is running.
    Cancelled,
    /// A build failed after creating some widgets. The backend may still
    /// hold them, so the controller must be discarded.
    Failed,
}

/// The last completed submit or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Submitted,
    Cancelled,
}

/// What [`FormController::apply`] did with each key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Keys written into widgets.
    pub applied: Vec<String>,
    /// Keys that match no field.
    pub ignored: Vec<String>,
    /// Keys whose value could not be coerced, with the reason.
    pub rejected: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// FormController
// ---------------------------------------------------------------------------

/// Builds and operates one form on a backend.
pub struct FormController<F: WidgetFactory> {
    factory: F,
    config: Option<FormConfig>,
    /// Parallel to `config.fields`.
    handles: Vec<WidgetHandle>,
    by_name: HashMap<String, usize>,
    state: FormState,
    last_outcome: Option<Outcome>,
    on_submit: Option<SubmitCallback>,
    on_cancel: Option<CancelCallback>,
    on_changed: Option<ChangeCallback>,
    buttons: HashMap<String, ButtonCallback>,
}

impl<F: WidgetFactory> FormController<F> {
    /// An unbuilt controller on `factory`.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            config: None,
            handles: Vec::new(),
            by_name: HashMap::new(),
            state: FormState::Unbuilt,
            last_outcome: None,
            on_submit: None,
            on_cancel: None,
            on_changed: None,
            buttons: HashMap::new(),
        }
    }

    /// Create a controller and build `config` on it.
    pub fn with_config(factory: F, config: FormConfig) -> Result<Self, FormError> {
        let mut controller = Self::new(factory);
        controller.build(config)?;
        Ok(controller)
    }

    // ── Build ────────────────────────────────────────────────────────

    /// Create every widget, arrange them, and mount the shell on the backend.
    ///
    /// A controller builds once; a second call fails with
    /// [`FormError::AlreadyBuilt`]. If a widget cannot be created the
    /// controller moves to [`FormState::Failed`] and later builds fail with
    /// [`FormError::BuildFailed`].
    pub fn build(&mut self, config: FormConfig) -> Result<(), FormError> {
        match self.state {
            FormState::Unbuilt => {}
            FormState::Failed => return Err(FormError::BuildFailed),
            _ => return Err(FormError::AlreadyBuilt),
        }

        let mut handles = Vec::with_capacity(config.fields.len());
        let mut by_name = HashMap::with_capacity(config.fields.len());
        for (i, field) in config.fields.iter().enumerate() {
            let handle = self.factory.create_widget(field).map_err(|err| {
                warn!(
                    field = %field.name,
                    created = handles.len(),
                    error = %err,
                    "build failed"
                );
                self.state = FormState::Failed;
                err
            })?;
            debug!(field = %field.name, kind = %field.kind, "widget created");
            handles.push(handle);
            by_name.insert(field.name.clone(), i);
        }
        self.handles = handles;
        self.by_name = by_name;

        let shell = self.shell_for(&config);
        self.factory.mount(&shell);

        info!(
            backend = self.factory.backend(),
            title = %config.window.title,
            fields = config.fields.len(),
            sections = shell.sections.len(),
            "form built"
        );
        self.config = Some(config);
        self.state = FormState::Built;
        Ok(())
    }

    fn shell_for(&self, config: &FormConfig) -> FormShell {
        let handle_of = |name: &String| self.by_name.get(name).map(|&i| self.handles[i]);

        let sections = if config.has_tabs() {
            // Each widget is placed once, in the first tab that lists it.
            let mut placed = HashSet::new();
            let mut sections: Vec<Section> = config
                .tabs
                .iter()
                .map(|tab| Section {
                    title: Some(tab.title.clone()),
                    layout: tab.layout,
                    enabled: tab.enabled,
                    tooltip: tab.tooltip.clone(),
                    widgets: tab
                        .fields
                        .iter()
                        .filter_map(handle_of)
                        .filter(|&handle| placed.insert(handle))
                        .collect(),
                })
                .collect();
            let untabbed: Vec<WidgetHandle> = config
                .untabbed_fields()
                .iter()
                .filter_map(|f| handle_of(&f.name))
                .collect();
            if !untabbed.is_empty() {
                sections.push(Section {
                    title: Some(UNTABBED_SECTION.to_owned()),
                    layout: config.layout,
                    enabled: true,
                    tooltip: None,
                    widgets: untabbed,
                });
            }
            sections
        } else {
            vec![Section {
                title: None,
                layout: config.layout,
                enabled: true,
                tooltip: None,
                widgets: self.handles.clone(),
            }]
        };

        let mut buttons: Vec<ButtonSlot> = config
            .custom_buttons
            .iter()
            .map(|b| ButtonSlot {
                role: ButtonRole::Custom(b.name.clone()),
                label: b.label.clone(),
                tooltip: b.tooltip.clone(),
                style: b.style.clone(),
                enabled: b.enabled,
            })
            .collect();
        if config.cancel_button {
            buttons.push(ButtonSlot {
                role: ButtonRole::Cancel,
                label: config.cancel_label.clone(),
                tooltip: None,
                style: None,
                enabled: true,
            });
        }
        if config.submit_button {
            buttons.push(ButtonSlot {
                role: ButtonRole::Submit,
                label: config.submit_label.clone(),
                tooltip: None,
                style: None,
                enabled: true,
            });
        }

        FormShell {
            window: config.window.clone(),
            sections,
            buttons,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn config(&self) -> Option<&FormConfig> {
        self.config.as_ref()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.config
            .iter()
            .flat_map(|c| c.fields.iter().map(|f| f.name.as_str()))
            .collect()
    }

    /// Widget handle of a field.
    pub fn handle(&self, name: &str) -> Option<WidgetHandle> {
        self.by_name.get(name).map(|&i| self.handles[i])
    }

    /// Field definition behind a widget handle.
    pub fn field_for(&self, handle: WidgetHandle) -> Option<&FieldSpec> {
        let i = self.handles.iter().position(|&h| h == handle)?;
        self.config.as_ref().map(|c| &c.fields[i])
    }

    /// Names of the configured custom buttons.
    pub fn custom_button_names(&self) -> Vec<&str> {
        self.config
            .iter()
            .flat_map(|c| c.custom_buttons.iter().map(|b| b.name.as_str()))
            .collect()
    }

    fn built(&self) -> Result<&FormConfig, FormError> {
        self.config.as_ref().ok_or(FormError::NotBuilt)
    }

    fn lookup(&self, name: &str) -> Result<WidgetHandle, FormError> {
        self.built()?;
        self.handle(name)
            .ok_or_else(|| FormError::UnknownField(name.to_owned()))
    }

    // ── Data ─────────────────────────────────────────────────────────

    /// Current values keyed by field name, in declaration order.
    fn read_flat(&self) -> Result<FormData, FormError> {
        let config = self.built()?;
        let mut flat = FormData::new();
        for (field, &handle) in config.fields.iter().zip(&self.handles) {
            flat.insert(field.name.clone(), self.factory.get_value(handle)?);
        }
        Ok(flat)
    }

    fn check_required(&self, flat: &FormData) -> Result<(), ValidationError> {
        let missing: Vec<String> = self
            .config
            .iter()
            .flat_map(|c| c.fields.iter())
            .filter(|f| f.required && flat.get(&f.name).is_none_or(coerce::is_empty))
            .map(|f| f.name.clone())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Nested data from every widget, without required-field checks.
    pub fn values(&self) -> Result<FormData, FormError> {
        let flat = self.read_flat()?;
        Ok(codec::unflatten(&flat)?)
    }

    /// Nested data from every widget.
    ///
    /// Fails with a [`ValidationError`] naming every required field that is
    /// null or blank.
    pub fn collect(&self) -> Result<FormData, FormError> {
        let flat = self.read_flat()?;
        self.check_required(&flat)?;
        let nested = codec::unflatten(&flat)?;
        debug!(fields = flat.len(), "form collected");
        Ok(nested)
    }

    /// Write flat or nested `data` into the matching widgets.
    ///
    /// A `_metadata` block and keys without a field are ignored. Values that
    /// cannot be coerced are reported and leave their widget unchanged.
    pub fn apply(&mut self, data: &FormData) -> Result<ApplyReport, FormError> {
        self.built()?;
        let mut data = data.clone();
        data::strip_metadata(&mut data);

        let mut report = ApplyReport::default();
        for (key, value) in codec::flatten(&data) {
            let Some(handle) = self.handle(&key) else {
                report.ignored.push(key);
                continue;
            };
            match self.factory.set_value(handle, &value) {
                Ok(()) => report.applied.push(key),
                Err(FormError::InvalidValue { reason, .. }) => {
                    warn!(field = %key, %reason, "value rejected");
                    report.rejected.push((key, reason));
                }
                Err(other) => return Err(other),
            }
        }
        debug!(
            applied = report.applied.len(),
            ignored = report.ignored.len(),
            rejected = report.rejected.len(),
            "data applied"
        );
        Ok(report)
    }

    /// Reset every widget to its empty value.
    pub fn clear(&mut self) -> Result<(), FormError> {
        let config = self.config.as_ref().ok_or(FormError::NotBuilt)?;
        for (field, &handle) in config.fields.iter().zip(&self.handles) {
            self.factory.set_value(handle, &coerce::empty_value(field))?;
        }
        debug!("form cleared");
        Ok(())
    }

    // ── Single fields ────────────────────────────────────────────────

    pub fn field_value(&self, name: &str) -> Result<Value, FormError> {
        self.factory.get_value(self.lookup(name)?)
    }

    pub fn set_field_value(&mut self, name: &str, value: &Value) -> Result<(), FormError> {
        let handle = self.lookup(name)?;
        self.factory.set_value(handle, value)
    }

    pub fn enable_field(&mut self, name: &str, enabled: bool) -> Result<(), FormError> {
        let handle = self.lookup(name)?;
        self.factory.set_enabled(handle, enabled)
    }

    pub fn show_field(&mut self, name: &str, visible: bool) -> Result<(), FormError> {
        let handle = self.lookup(name)?;
        self.factory.set_visible(handle, visible)
    }

    pub fn field_state(&self, name: &str) -> Result<WidgetState, FormError> {
        self.factory.widget_state(self.lookup(name)?)
    }

    // ── Callbacks ────────────────────────────────────────────────────

    pub fn on_submit<C>(&mut self, callback: C)
    where
        C: FnMut(&FormData) -> Result<(), CallbackError> + 'static,
    {
        self.on_submit = Some(Box::new(callback));
    }

    pub fn on_cancel<C>(&mut self, callback: C)
    where
        C: FnMut() -> Result<(), CallbackError> + 'static,
    {
        self.on_cancel = Some(Box::new(callback));
    }

    /// Register the callback of custom button `name`, replacing any previous one.
    pub fn on_custom_button<C>(&mut self, name: impl Into<String>, callback: C)
    where
        C: FnMut(&ButtonSpec, Result<FormData, ValidationError>) -> Result<(), CallbackError>
            + 'static,
    {
        self.buttons.insert(name.into(), Box::new(callback));
    }

    /// Remove a custom button callback. Returns whether one was registered.
    pub fn remove_custom_callback(&mut self, name: &str) -> bool {
        self.buttons.remove(name).is_some()
    }

    pub fn on_field_changed<C>(&mut self, callback: C)
    where
        C: FnMut(&str, &Value) + 'static,
    {
        self.on_changed = Some(Box::new(callback));
    }

    /// Report a user edit of `handle` to the change callback.
    pub fn notify_changed(&mut self, handle: WidgetHandle) -> Result<(), FormError> {
        let name = self
            .field_for(handle)
            .map(|f| f.name.clone())
            .ok_or_else(|| FormError::UnknownWidget(format!("{handle:?}")))?;
        let value = self.factory.get_value(handle)?;
        if let Some(callback) = self.on_changed.as_mut() {
            callback(&name, &value);
        }
        Ok(())
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Collect and hand the data to the submit callback.
    ///
    /// On a [`ValidationError`] the callback is not invoked and the form stays
    /// built and editable.
    pub fn submit(&mut self) -> Result<FormData, FormError> {
        let data = match self.collect() {
            Ok(data) => data,
            Err(err) => {
                info!(error = %err, "submit rejected");
                return Err(err);
            }
        };

        self.state = FormState::Submitted;
        let result = match self.on_submit.as_mut() {
            Some(callback) => callback(&data),
            None => Ok(()),
        };
        self.state = FormState::Built;
        self.last_outcome = Some(Outcome::Submitted);
        info!(fields = data.len(), "form submitted");

        result.map_err(|source| FormError::Callback {
            action: "submit".to_owned(),
            source,
        })?;
        Ok(data)
    }

    /// Run the cancel callback.
    pub fn cancel(&mut self) -> Result<(), FormError> {
        self.built()?;
        self.state = FormState::Cancelled;
        let result = match self.on_cancel.as_mut() {
            Some(callback) => callback(),
            None => Ok(()),
        };
        self.state = FormState::Built;
        self.last_outcome = Some(Outcome::Cancelled);
        info!("form cancelled");

        result.map_err(|source| FormError::Callback {
            action: "cancel".to_owned(),
            source,
        })
    }

    /// Invoke custom button `name` with the result of collecting the form.
    pub fn press(&mut self, name: &str) -> Result<(), FormError> {
        let collected = match self.collect() {
            Ok(data) => Ok(data),
            Err(FormError::Validation(err)) => Err(err),
            Err(other) => return Err(other),
        };

        let config = self.config.as_ref().ok_or(FormError::NotBuilt)?;
        let spec = config
            .button(name)
            .ok_or_else(|| FormError::UnknownButton(name.to_owned()))?;
        let Some(callback) = self.buttons.get_mut(name) else {
            debug!(button = name, "no callback registered");
            return Ok(());
        };

        debug!(button = name, "custom button pressed");
        callback(spec, collected).map_err(|source| FormError::Callback {
            action: name.to_owned(),
            source,
        })
    }

    /// Dispatch a button by role.
    pub fn trigger(&mut self, role: &ButtonRole) -> Result<(), FormError> {
        match role {
            ButtonRole::Submit => self.submit().map(|_| ()),
            ButtonRole::Cancel => self.cancel(),
            ButtonRole::Custom(name) => self.press(name),
        }
    }

    // ── Files ────────────────────────────────────────────────────────

    /// Read a data file and apply it.
    pub fn load_data_file(&mut self, path: impl AsRef<Path>) -> Result<ApplyReport, FormError> {
        let data = data::read_data(path)?;
        self.apply(&data)
    }

    /// Write the current values, optionally dropping empty ones.
    pub fn save_data_file(&self, path: impl AsRef<Path>, include_empty: bool) -> Result<(), FormError> {
        let values = self.values()?;
        let values = if include_empty {
            values
        } else {
            data::drop_empty(&values)
        };
        data::write_data(path, &values)
    }

    /// Current values followed by a `_metadata` block.
    pub fn data_with_metadata(&self) -> Result<FormData, FormError> {
        let values = self.values()?;
        data::with_metadata(&values, &Metadata::for_config(self.built()?))
    }

    pub fn save_data_with_metadata(&self, path: impl AsRef<Path>) -> Result<(), FormError> {
        data::write_data(path, &self.data_with_metadata()?)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
