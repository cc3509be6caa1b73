//! Every backend must give the controller the same observable behavior.
//! Each check here runs against the headless and the terminal backend.

use gilt_forms::backend::{FormShell, WidgetState};
use gilt_forms::config::{load_from_value, FieldSpec, FieldType};
use gilt_forms::controller::Outcome;
use gilt_forms::{
    FormController, FormError, FormState, HeadlessBackend, TerminalBackend,
    UnsupportedFieldTypeError, WidgetFactory, WidgetHandle,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn every_type() -> Value {
    json!({
        "fields": [
            {"name": "text", "type": "text", "label": "Text"},
            {"name": "secret", "type": "password", "label": "Secret"},
            {"name": "mail", "type": "email", "label": "Mail"},
            {"name": "site", "type": "url", "label": "Site"},
            {"name": "bio", "type": "textarea", "label": "Bio"},
            {"name": "count", "type": "int", "label": "Count", "min_value": 0, "max_value": 10},
            {"name": "ratio", "type": "float", "label": "Ratio", "min_value": 0, "max_value": 5.5},
            {"name": "qty", "type": "number", "label": "Qty", "min_value": 1, "max_value": 9},
            {"name": "level", "type": "range", "label": "Level", "min_value": 0, "max_value": 20},
            {"name": "agree", "type": "checkbox", "label": "Agree"},
            {"name": "size", "type": "select", "label": "Size", "options": ["S", "M", "L"]},
            {"name": "plan", "type": "radio", "label": "Plan", "choices": ["free", "pro"]},
            {"name": "day", "type": "date", "label": "Day", "default_value": "2024-02-29"},
            {"name": "at", "type": "time", "label": "At", "default_value": "09:30"},
            {"name": "when", "type": "datetime", "label": "When",
             "default_value": "2024-02-29T09:30:00"},
            {"name": "tint", "type": "color", "label": "Tint", "default_value": "#ABC"},
            {"name": "doc", "type": "file", "label": "Doc"}
        ]
    })
}

fn build<F: WidgetFactory>(factory: F, config: &Value) -> FormController<F> {
    FormController::with_config(factory, load_from_value(config).unwrap()).unwrap()
}

/// Run `check` once per backend.
macro_rules! on_every_backend {
    ($name:ident, $check:ident) => {
        mod $name {
            use super::*;

            #[test]
            fn headless() {
                $check(HeadlessBackend::new());
            }

            #[test]
            fn terminal() {
                $check(TerminalBackend::new());
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn initial_values<F: WidgetFactory>(factory: F) {
    let form = build(factory, &every_type());
    let values = form.values().unwrap();
    assert_eq!(
        Value::Object(values),
        json!({
            "text": "", "secret": "", "mail": "", "site": "", "bio": "",
            "count": 0, "ratio": 0.0, "qty": 1, "level": 0,
            "agree": false, "size": "S", "plan": null,
            "day": "2024-02-29", "at": "09:30:00", "when": "2024-02-29T09:30:00",
            "tint": "#aabbcc", "doc": ""
        })
    );
}
on_every_backend!(initial_values_match, initial_values);

fn values_are_coerced<F: WidgetFactory>(factory: F) {
    let mut form = build(factory, &every_type());
    form.set_field_value("count", &json!(99)).unwrap();
    form.set_field_value("ratio", &json!("2.5")).unwrap();
    form.set_field_value("level", &json!(-4)).unwrap();
    form.set_field_value("agree", &json!(true)).unwrap();
    form.set_field_value("plan", &json!("pro")).unwrap();
    form.set_field_value("tint", &json!("orange")).unwrap();
    form.set_field_value("text", &json!(42)).unwrap();

    assert_eq!(form.field_value("count").unwrap(), json!(10));
    assert_eq!(form.field_value("ratio").unwrap(), json!(2.5));
    assert_eq!(form.field_value("level").unwrap(), json!(0));
    assert_eq!(form.field_value("agree").unwrap(), json!(true));
    assert_eq!(form.field_value("plan").unwrap(), json!("pro"));
    assert_eq!(form.field_value("tint").unwrap(), json!("#ffa500"));
    assert_eq!(form.field_value("text").unwrap(), json!("42"));
}
on_every_backend!(coercion_matches, values_are_coerced);

fn bad_values_are_rejected<F: WidgetFactory>(factory: F) {
    let mut form = build(factory, &every_type());
    for (name, value) in [
        ("count", json!("lots")),
        ("size", json!("XL")),
        ("day", json!("2023-02-29")),
        ("tint", json!("#12345")),
    ] {
        let before = form.field_value(name).unwrap();
        match form.set_field_value(name, &value) {
            Err(FormError::InvalidValue { field, .. }) => assert_eq!(field, name),
            other => panic!("{name}: expected InvalidValue, got {other:?}"),
        }
        assert_eq!(form.field_value(name).unwrap(), before, "{name} changed");
    }

    let report = form
        .apply(&load_map(json!({"count": 3, "size": "XL", "nope": 1})))
        .unwrap();
    assert_eq!(report.applied, vec!["count"]);
    assert_eq!(report.ignored, vec!["nope"]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0, "size");
}
on_every_backend!(rejection_matches, bad_values_are_rejected);

fn state_flags<F: WidgetFactory>(factory: F) {
    let mut form = build(factory, &every_type());
    assert_eq!(form.field_state("mail").unwrap(), WidgetState::default());
    form.enable_field("mail", false).unwrap();
    form.show_field("bio", false).unwrap();
    assert_eq!(
        form.field_state("mail").unwrap(),
        WidgetState { enabled: false, visible: true }
    );
    assert!(!form.field_state("bio").unwrap().visible);

    // Disabled and hidden fields still hold and report values.
    form.set_field_value("mail", &json!("a@b.c")).unwrap();
    assert_eq!(form.collect().unwrap()["mail"], json!("a@b.c"));
    assert!(matches!(
        form.field_state("missing"),
        Err(FormError::UnknownField(name)) if name == "missing"
    ));
}
on_every_backend!(state_flags_match, state_flags);

fn lifecycle<F: WidgetFactory>(factory: F) {
    let mut form = FormController::new(factory);
    assert_eq!(form.state(), FormState::Unbuilt);
    assert!(matches!(form.collect(), Err(FormError::NotBuilt)));
    assert!(matches!(form.cancel(), Err(FormError::NotBuilt)));

    let config = load_from_value(&json!({
        "fields": [
            {"name": "a", "type": "text", "label": "A", "required": true},
            {"name": "b", "type": "radio", "label": "B", "options": ["x"], "required": true},
            {"name": "c", "type": "checkbox", "label": "C", "required": true}
        ]
    }))
    .unwrap();
    form.build(config.clone()).unwrap();
    assert_eq!(form.state(), FormState::Built);
    assert!(matches!(form.build(config), Err(FormError::AlreadyBuilt)));

    let states = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&states);
    form.on_submit(move |data| {
        log.borrow_mut().push(data.len());
        Ok(())
    });

    match form.submit() {
        Err(FormError::Validation(err)) => assert_eq!(err.missing, vec!["a", "b"]),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(form.state(), FormState::Built);
    assert!(states.borrow().is_empty());

    form.set_field_value("a", &json!("  ")).unwrap();
    form.set_field_value("b", &json!("x")).unwrap();
    assert!(form.submit().is_err());
    form.set_field_value("a", &json!("ok")).unwrap();
    form.submit().unwrap();
    assert_eq!(*states.borrow(), vec![3]);
    assert_eq!(form.state(), FormState::Built);
    assert_eq!(form.last_outcome(), Some(Outcome::Submitted));

    form.cancel().unwrap();
    assert_eq!(form.last_outcome(), Some(Outcome::Cancelled));
    assert_eq!(form.state(), FormState::Built);
}
on_every_backend!(lifecycle_matches, lifecycle);

fn foreign_handles_are_rejected<F: WidgetFactory>(mut factory: F) {
    let handle = factory
        .create_widget(&FieldSpec::new("n", FieldType::Int, "N"))
        .unwrap();
    let foreign = WidgetHandle::default();
    assert_ne!(handle, foreign);
    assert!(matches!(factory.get_value(foreign), Err(FormError::UnknownWidget(_))));
    assert!(matches!(
        factory.set_value(foreign, &json!(1)),
        Err(FormError::UnknownWidget(_))
    ));
    assert!(matches!(
        factory.set_value(handle, &json!([1])),
        Err(FormError::InvalidValue { .. })
    ));
}
on_every_backend!(foreign_handles_match, foreign_handles_are_rejected);

fn handles_from_a_larger_backend_are_rejected<F: WidgetFactory>(mut factory: F) {
    let mut other = HeadlessBackend::new();
    other.create_widget(&FieldSpec::new("a", FieldType::Text, "A")).unwrap();
    let second = other
        .create_widget(&FieldSpec::new("b", FieldType::Text, "B"))
        .unwrap();

    factory
        .create_widget(&FieldSpec::new("a", FieldType::Text, "A"))
        .unwrap();
    assert!(matches!(factory.get_value(second), Err(FormError::UnknownWidget(_))));
    assert!(matches!(factory.widget_state(second), Err(FormError::UnknownWidget(_))));
}
on_every_backend!(larger_backend_handles, handles_from_a_larger_backend_are_rejected);

fn load_map(value: Value) -> gilt_forms::FormData {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

// ---------------------------------------------------------------------------
// A backend with gaps
// ---------------------------------------------------------------------------

/// Wraps the headless backend but refuses colors.
struct NoColors(HeadlessBackend);

impl WidgetFactory for NoColors {
    fn backend(&self) -> &'static str {
        "no-colors"
    }

    fn create_widget(&mut self, field: &FieldSpec) -> Result<WidgetHandle, UnsupportedFieldTypeError> {
        if field.kind == FieldType::Color {
            return Err(UnsupportedFieldTypeError {
                backend: self.backend(),
                kind: field.kind,
            });
        }
        self.0.create_widget(field)
    }

    fn get_value(&self, handle: WidgetHandle) -> Result<Value, FormError> {
        self.0.get_value(handle)
    }

    fn set_value(&mut self, handle: WidgetHandle, value: &Value) -> Result<(), FormError> {
        self.0.set_value(handle, value)
    }

    fn set_enabled(&mut self, handle: WidgetHandle, enabled: bool) -> Result<(), FormError> {
        self.0.set_enabled(handle, enabled)
    }

    fn set_visible(&mut self, handle: WidgetHandle, visible: bool) -> Result<(), FormError> {
        self.0.set_visible(handle, visible)
    }

    fn widget_state(&self, handle: WidgetHandle) -> Result<WidgetState, FormError> {
        self.0.widget_state(handle)
    }

    fn mount(&mut self, shell: &FormShell) {
        self.0.mount(shell)
    }
}

#[test]
fn unsupported_field_type_aborts_build() {
    let mut form = FormController::new(NoColors(HeadlessBackend::new()));
    let err = form
        .build(load_from_value(&every_type()).unwrap())
        .unwrap_err();
    match err {
        FormError::Unsupported(err) => {
            assert_eq!(err.kind, FieldType::Color);
            assert_eq!(
                err.to_string(),
                "backend 'no-colors' cannot render field type 'color'"
            );
        }
        other => panic!("expected unsupported type, got {other:?}"),
    }
    assert_eq!(form.state(), FormState::Failed);
    assert!(form.factory().0.shell().is_none());

    // Widgets made before the failure stay behind, so the controller refuses
    // another attempt.
    let retry = form.build(load_from_value(&json!({"fields": []})).unwrap());
    assert!(matches!(retry, Err(FormError::BuildFailed)));
    assert_eq!(form.state(), FormState::Failed);
    assert!(matches!(form.collect(), Err(FormError::NotBuilt)));
}
