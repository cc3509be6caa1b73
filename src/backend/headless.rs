//! In-memory backend with no display.

use serde_json::Value;
use slotmap::SlotMap;
use tracing::trace;

use super::coerce;
use super::{unknown, FormShell, WidgetFactory, WidgetHandle, WidgetState};
use crate::config::FieldSpec;
use crate::error::{FormError, UnsupportedFieldTypeError};

#[derive(Debug, Clone)]
struct Slot {
    field: FieldSpec,
    value: Value,
    state: WidgetState,
}

/// Stores one value and its flags per widget. Supports every field type.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    widgets: SlotMap<WidgetHandle, Slot>,
    shell: Option<FormShell>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrangement received from the controller, if mounted.
    pub fn shell(&self) -> Option<&FormShell> {
        self.shell.as_ref()
    }

    /// Number of widgets created so far.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    fn slot_mut(&mut self, handle: WidgetHandle) -> Result<&mut Slot, FormError> {
        self.widgets.get_mut(handle).ok_or_else(|| unknown(handle))
    }
}

impl WidgetFactory for HeadlessBackend {
    fn backend(&self) -> &'static str {
        "headless"
    }

    fn create_widget(&mut self, field: &FieldSpec) -> Result<WidgetHandle, UnsupportedFieldTypeError> {
        let value = coerce::initial_value(field);
        trace!(field = %field.name, %value, "headless widget created");
        Ok(self.widgets.insert(Slot {
            field: field.clone(),
            value,
            state: WidgetState::default(),
        }))
    }

    fn get_value(&self, handle: WidgetHandle) -> Result<Value, FormError> {
        self.widgets
            .get(handle)
            .map(|slot| slot.value.clone())
            .ok_or_else(|| unknown(handle))
    }

    fn set_value(&mut self, handle: WidgetHandle, value: &Value) -> Result<(), FormError> {
        let slot = self.slot_mut(handle)?;
        slot.value = coerce::coerce(&slot.field, value)
            .map_err(|reason| FormError::invalid(&slot.field.name, reason))?;
        Ok(())
    }

    fn set_enabled(&mut self, handle: WidgetHandle, enabled: bool) -> Result<(), FormError> {
        self.slot_mut(handle)?.state.enabled = enabled;
        Ok(())
    }

    fn set_visible(&mut self, handle: WidgetHandle, visible: bool) -> Result<(), FormError> {
        self.slot_mut(handle)?.state.visible = visible;
        Ok(())
    }

    fn widget_state(&self, handle: WidgetHandle) -> Result<WidgetState, FormError> {
        self.widgets
            .get(handle)
            .map(|slot| slot.state)
            .ok_or_else(|| unknown(handle))
    }

    fn mount(&mut self, shell: &FormShell) {
        self.shell = Some(shell.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldType;
    use serde_json::json;

    #[test]
    fn rejected_value_leaves_widget_unchanged() {
        let mut backend = HeadlessBackend::new();
        let handle = backend
            .create_widget(&FieldSpec::new("age", FieldType::Int, "Age").with_default(30))
            .unwrap();

        let err = backend.set_value(handle, &json!("old")).unwrap_err();
        assert!(matches!(err, FormError::InvalidValue { ref field, .. } if field == "age"));
        assert_eq!(backend.get_value(handle).unwrap(), json!(30));
    }

    #[test]
    fn flags_do_not_touch_value() {
        let mut backend = HeadlessBackend::new();
        let handle = backend
            .create_widget(&FieldSpec::new("t", FieldType::Text, "T").with_default("keep"))
            .unwrap();
        backend.set_enabled(handle, false).unwrap();
        backend.set_visible(handle, false).unwrap();
        backend.set_visible(handle, false).unwrap();
        assert_eq!(
            backend.widget_state(handle).unwrap(),
            WidgetState {
                enabled: false,
                visible: false
            }
        );
        assert_eq!(backend.get_value(handle).unwrap(), json!("keep"));
    }

    #[test]
    fn foreign_handle_is_unknown() {
        let mut other = HeadlessBackend::new();
        let foreign = other
            .create_widget(&FieldSpec::new("x", FieldType::Text, "X"))
            .unwrap();
        let backend = HeadlessBackend::new();
        assert!(matches!(backend.get_value(foreign), Err(FormError::UnknownWidget(_))));
    }
}
