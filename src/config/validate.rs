//! Validation passes over raw JSON and parsed definitions.
//!
//! Loading runs three passes in order and stops at the first violation:
//! [`check_shape`] on the raw document, [`check_field`] on every parsed field,
//! then [`check_cross_field`] on the assembled configuration.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::model::{FieldSpec, FormConfig};
use crate::error::ConfigError;
use crate::format::FloatFormat;

// ---------------------------------------------------------------------------
// Structural shape
// ---------------------------------------------------------------------------

/// Check the JSON shape of the document: container types of every top-level
/// key and the presence of `fields` or `tabs`.
pub fn check_shape(value: &Value) -> Result<&Map<String, Value>, ConfigError> {
    let root = value.as_object().ok_or_else(|| ConfigError::Shape {
        context: "configuration".into(),
        expected: "a JSON object",
    })?;

    expect(root, "window", "configuration", Value::is_object, "an object")?;
    expect(root, "layout", "configuration", Value::is_string, "a string")?;
    expect(root, "use_tabs", "configuration", Value::is_boolean, "a boolean")?;
    expect(root, "submit_button", "configuration", Value::is_boolean, "a boolean")?;
    expect(root, "cancel_button", "configuration", Value::is_boolean, "a boolean")?;
    expect(root, "submit_label", "configuration", Value::is_string, "a string")?;
    expect(root, "cancel_label", "configuration", Value::is_string, "a string")?;

    let fields = object_array(root, "fields", "configuration")?;
    let tabs = object_array(root, "tabs", "configuration")?;
    object_array(root, "custom_buttons", "configuration")?;

    for (i, tab) in tabs.iter().flatten().enumerate() {
        let context = format!("tabs[{i}]");
        expect(tab, "fields", &context, Value::is_array, "an array")?;
    }

    let use_tabs = root.get("use_tabs").and_then(Value::as_bool);
    let has_tabs = tabs.as_ref().is_some_and(|t| !t.is_empty());
    if use_tabs == Some(true) && !has_tabs {
        return Err(ConfigError::MissingTabs);
    }
    if !has_tabs && fields.is_none() {
        return Err(ConfigError::MissingKey {
            context: "configuration".into(),
            key: "fields",
        });
    }

    Ok(root)
}

/// Fail unless `map[key]` is absent, null, or satisfies `check`.
fn expect(
    map: &Map<String, Value>,
    key: &str,
    context: &str,
    check: fn(&Value) -> bool,
    expected: &'static str,
) -> Result<(), ConfigError> {
    match map.get(key) {
        Some(value) if !value.is_null() && !check(value) => Err(ConfigError::Shape {
            context: format!("{context}.{key}"),
            expected,
        }),
        _ => Ok(()),
    }
}

/// `map[key]` as an array whose every element is an object.
fn object_array<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Option<Vec<&'a Map<String, Value>>>, ConfigError> {
    let Some(value) = map.get(key).filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let items = value.as_array().ok_or_else(|| ConfigError::Shape {
        context: format!("{context}.{key}"),
        expected: "an array",
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object().ok_or_else(|| ConfigError::Shape {
                context: format!("{key}[{i}]"),
                expected: "an object",
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

// ---------------------------------------------------------------------------
// Per-field checks
// ---------------------------------------------------------------------------

/// Check the invariants of a single parsed field.
pub fn check_field(field: &FieldSpec) -> Result<(), ConfigError> {
    if field.name.is_empty() || field.name.split('.').any(str::is_empty) {
        return Err(ConfigError::EmptyFieldName(field.name.clone()));
    }

    if field.kind.is_choice() && field.options.is_empty() {
        return Err(ConfigError::EmptyOptions(field.name.clone()));
    }

    if field.kind.is_numeric() {
        if let (Some(min), Some(max)) = (field.min_value, field.max_value) {
            if min > max {
                return Err(ConfigError::InvertedRange {
                    field: field.name.clone(),
                    min,
                    max,
                });
            }
        }
    }

    if let Some(format) = field.format_string.as_deref() {
        if field.is_real() && FloatFormat::parse(format).is_none() {
            return Err(ConfigError::InvalidFormatString {
                field: field.name.clone(),
                format: format.to_owned(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Cross-field checks
// ---------------------------------------------------------------------------

/// Uniqueness of field, tab and button names; tab references, each field in
/// at most one tab; dotted-name collisions between a field and the prefix of
/// another.
pub fn check_cross_field(config: &FormConfig) -> Result<(), ConfigError> {
    let mut names = HashSet::new();
    for field in &config.fields {
        if !names.insert(field.name.as_str()) {
            return Err(ConfigError::DuplicateField(field.name.clone()));
        }
    }

    let mut tabs = HashSet::new();
    let mut tabbed = HashSet::new();
    for tab in &config.tabs {
        if !tabs.insert(tab.name.as_str()) {
            return Err(ConfigError::DuplicateTab(tab.name.clone()));
        }
        if let Some(missing) = tab.fields.iter().find(|f| !names.contains(f.as_str())) {
            return Err(ConfigError::UnknownTabField {
                tab: tab.name.clone(),
                field: missing.clone(),
            });
        }
        if let Some(repeated) = tab.fields.iter().find(|f| !tabbed.insert(f.as_str())) {
            return Err(ConfigError::RepeatedTabField {
                tab: tab.name.clone(),
                field: repeated.clone(),
            });
        }
    }

    let mut buttons = HashSet::new();
    for button in &config.custom_buttons {
        if !buttons.insert(button.name.as_str()) {
            return Err(ConfigError::DuplicateButton(button.name.clone()));
        }
    }

    // `a` and `a.b` cannot both exist: the nested form would need `a` to be
    // a value and a mapping at once.
    for field in &config.fields {
        let mut prefix = String::new();
        let segments: Vec<&str> = field.name.split('.').collect();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            if names.contains(prefix.as_str()) {
                return Err(ConfigError::KeyCollision {
                    path: field.name.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{ButtonSpec, TabSpec};
    use crate::config::FieldType;
    use serde_json::json;

    fn text(name: &str) -> FieldSpec {
        FieldSpec::new(name, FieldType::Text, name)
    }

    // ── Shape ────────────────────────────────────────────────────────

    #[test]
    fn shape_requires_object_root() {
        let err = check_shape(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
    }

    #[test]
    fn shape_requires_fields_without_tabs() {
        let err = check_shape(&json!({"window": {}})).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { key: "fields", .. }));
    }

    #[test]
    fn shape_rejects_use_tabs_without_tabs() {
        let err = check_shape(&json!({"use_tabs": true, "fields": []})).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTabs));
    }

    #[test]
    fn shape_rejects_wrong_container_types() {
        let err = check_shape(&json!({"fields": {"a": 1}})).unwrap_err();
        assert_eq!(err.to_string(), "configuration.fields: expected an array");

        let err = check_shape(&json!({"fields": ["a"]})).unwrap_err();
        assert_eq!(err.to_string(), "fields[0]: expected an object");

        let err = check_shape(&json!({"fields": [], "layout": 3})).unwrap_err();
        assert_eq!(err.to_string(), "configuration.layout: expected a string");
    }

    #[test]
    fn shape_accepts_tabs_only_document() {
        let doc = json!({"tabs": [{"name": "t", "title": "T", "fields": []}]});
        assert!(check_shape(&doc).is_ok());
    }

    // ── Per-field ────────────────────────────────────────────────────

    #[test]
    fn field_name_segments_must_be_non_empty() {
        assert!(matches!(
            check_field(&text("a..b")),
            Err(ConfigError::EmptyFieldName(_))
        ));
        assert!(matches!(check_field(&text("")), Err(ConfigError::EmptyFieldName(_))));
    }

    #[test]
    fn choice_fields_need_options() {
        let field = FieldSpec::new("color", FieldType::Select, "Color");
        assert!(matches!(check_field(&field), Err(ConfigError::EmptyOptions(_))));
        assert!(check_field(&field.with_options(["red"])).is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let field = FieldSpec::new("n", FieldType::Int, "N").with_range(Some(5.0), Some(1.0));
        assert!(matches!(check_field(&field), Err(ConfigError::InvertedRange { .. })));
    }

    #[test]
    fn real_fields_need_parsable_format() {
        let field = FieldSpec::new("f", FieldType::Float, "F").with_format("bogus");
        assert!(matches!(
            check_field(&field),
            Err(ConfigError::InvalidFormatString { .. })
        ));
        let field = FieldSpec::new("f", FieldType::Float, "F").with_format(".3f");
        assert!(check_field(&field).is_ok());
    }

    // ── Cross-field ──────────────────────────────────────────────────

    #[test]
    fn duplicate_names_are_rejected() {
        let config = FormConfig::with_fields(vec![text("a"), text("a")]);
        assert!(matches!(
            check_cross_field(&config),
            Err(ConfigError::DuplicateField(name)) if name == "a"
        ));

        let mut config = FormConfig::with_fields(vec![text("a")]);
        config.custom_buttons = vec![ButtonSpec::new("x", "X"), ButtonSpec::new("x", "Y")];
        assert!(matches!(check_cross_field(&config), Err(ConfigError::DuplicateButton(_))));

        let mut config = FormConfig::with_fields(vec![text("a")]);
        config.tabs = vec![TabSpec::new("t", "T"), TabSpec::new("t", "U")];
        assert!(matches!(check_cross_field(&config), Err(ConfigError::DuplicateTab(_))));
    }

    #[test]
    fn tab_references_must_exist() {
        let mut config = FormConfig::with_fields(vec![text("a")]);
        config.tabs = vec![TabSpec::new("t", "T").with_fields(["a", "ghost"])];
        let err = check_cross_field(&config).unwrap_err();
        assert_eq!(err.to_string(), "tab 't' references unknown field 'ghost'");
    }

    #[test]
    fn a_field_belongs_to_one_tab() {
        let mut config = FormConfig::with_fields(vec![text("a"), text("b")]);
        config.tabs = vec![
            TabSpec::new("t", "T").with_fields(["a"]),
            TabSpec::new("u", "U").with_fields(["b", "a"]),
        ];
        let err = check_cross_field(&config).unwrap_err();
        assert_eq!(err.to_string(), "tab 'u' lists field 'a', which is already in a tab");

        config.tabs = vec![TabSpec::new("t", "T").with_fields(["b", "b"])];
        assert!(matches!(
            check_cross_field(&config),
            Err(ConfigError::RepeatedTabField { tab, field }) if tab == "t" && field == "b"
        ));
    }

    #[test]
    fn dotted_prefix_collision_is_rejected() {
        let config = FormConfig::with_fields(vec![text("db"), text("db.port")]);
        assert!(matches!(
            check_cross_field(&config),
            Err(ConfigError::KeyCollision { path }) if path == "db.port"
        ));

        let config = FormConfig::with_fields(vec![text("db.host"), text("db.port")]);
        assert!(check_cross_field(&config).is_ok());
    }
}
