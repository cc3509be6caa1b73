//! Loads a [`FormConfig`] from a file, a JSON string, or a parsed value.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::{debug, warn};

use super::field_type::FieldType;
use super::model::{
    ButtonSpec, FieldSpec, FormConfig, LayoutKind, NumericKind, TabSpec, WindowSpec,
};
use super::validate;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// ConfigSource
// ---------------------------------------------------------------------------

/// Where a configuration comes from.
#[derive(Debug, Clone, Copy)]
pub enum ConfigSource<'a> {
    /// A JSON file on disk.
    Path(&'a Path),
    /// JSON text.
    Json(&'a str),
    /// An already-parsed document.
    Value(&'a Value),
}

impl<'a> From<&'a Path> for ConfigSource<'a> {
    fn from(path: &'a Path) -> Self {
        ConfigSource::Path(path)
    }
}

impl<'a> From<&'a Value> for ConfigSource<'a> {
    fn from(value: &'a Value) -> Self {
        ConfigSource::Value(value)
    }
}

/// Load and validate a configuration.
///
/// Either the whole document is valid and a [`FormConfig`] is returned, or the
/// first violation is reported. No partially built configuration escapes.
pub fn load<'a>(source: impl Into<ConfigSource<'a>>) -> Result<FormConfig, ConfigError> {
    match source.into() {
        ConfigSource::Path(path) => load_from_file(path),
        ConfigSource::Json(text) => load_from_str(text),
        ConfigSource::Value(value) => load_from_value(value),
    }
}

/// Read `path` and load it.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<FormConfig, ConfigError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading form configuration");
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&text)
}

/// Parse JSON text and load it.
pub fn load_from_str(text: &str) -> Result<FormConfig, ConfigError> {
    let value: Value = serde_json::from_str(text)?;
    load_from_value(&value)
}

/// Load an already-parsed document.
pub fn load_from_value(value: &Value) -> Result<FormConfig, ConfigError> {
    validate::check_shape(value)?;
    let raw = RawConfig::deserialize(value).map_err(|source| ConfigError::Invalid {
        context: "configuration".into(),
        source,
    })?;
    let config = raw.into_config()?;
    validate::check_cross_field(&config)?;
    debug!(
        title = %config.window.title,
        fields = config.fields.len(),
        tabs = config.tabs.len(),
        buttons = config.custom_buttons.len(),
        "form configuration loaded"
    );
    Ok(config)
}

// ---------------------------------------------------------------------------
// Raw document
// ---------------------------------------------------------------------------

// Every key is optional at this stage; required keys are reported with their
// position by the conversions below.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    window: Option<RawWindow>,
    layout: Option<String>,
    fields: Option<Vec<RawField>>,
    use_tabs: Option<bool>,
    tabs: Option<Vec<RawTab>>,
    submit_button: Option<bool>,
    submit_label: Option<String>,
    cancel_button: Option<bool>,
    cancel_label: Option<String>,
    custom_buttons: Option<Vec<RawButton>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWindow {
    title: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
    resizable: Option<bool>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawField {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    label: Option<String>,
    required: Option<bool>,
    default_value: Option<Value>,
    placeholder: Option<String>,
    tooltip: Option<String>,
    min_value: Option<Number>,
    max_value: Option<Number>,
    #[serde(alias = "choices")]
    options: Option<Vec<String>>,
    format_string: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTab {
    name: Option<String>,
    title: Option<String>,
    layout: Option<String>,
    fields: Option<Vec<RawTabEntry>>,
    enabled: Option<bool>,
    tooltip: Option<String>,
}

/// A tab entry is a field name, or an inline definition when the document
/// has no top-level `fields`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTabEntry {
    Name(String),
    Definition(RawField),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawButton {
    name: Option<String>,
    label: Option<String>,
    tooltip: Option<String>,
    style: Option<String>,
    icon: Option<String>,
    enabled: Option<bool>,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

impl RawConfig {
    fn into_config(self) -> Result<FormConfig, ConfigError> {
        let defaults = FormConfig::default();

        let window = self.window.unwrap_or_default().into_spec()?;
        let layout = parse_layout(self.layout, "configuration")?.unwrap_or(defaults.layout);

        let has_main_fields = self.fields.is_some();
        let mut fields = self
            .fields
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, field)| field.into_spec(&format!("fields[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tabs = Vec::new();
        for (i, tab) in self.tabs.unwrap_or_default().into_iter().enumerate() {
            tabs.push(tab.into_spec(i, has_main_fields, &mut fields)?);
        }

        let custom_buttons = self
            .custom_buttons
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, button)| button.into_spec(&format!("custom_buttons[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FormConfig {
            window,
            layout,
            fields,
            use_tabs: self.use_tabs.unwrap_or(!tabs.is_empty()),
            tabs,
            submit_button: self.submit_button.unwrap_or(defaults.submit_button),
            submit_label: self.submit_label.unwrap_or(defaults.submit_label),
            cancel_button: self.cancel_button.unwrap_or(defaults.cancel_button),
            cancel_label: self.cancel_label.unwrap_or(defaults.cancel_label),
            custom_buttons,
        })
    }
}

impl RawWindow {
    fn into_spec(self) -> Result<WindowSpec, ConfigError> {
        let ctx = "window";
        let defaults = WindowSpec::default();
        Ok(WindowSpec {
            title: self.title.unwrap_or(defaults.title),
            width: dimension(self.width, "width", ctx)?.unwrap_or(defaults.width),
            height: dimension(self.height, "height", ctx)?.unwrap_or(defaults.height),
            resizable: self.resizable.unwrap_or(defaults.resizable),
            icon: self.icon,
        })
    }
}

impl RawField {
    fn into_spec(self, ctx: &str) -> Result<FieldSpec, ConfigError> {
        let name = required(self.name, "name", ctx)?;
        let type_name = required(self.kind, "type", ctx)?;
        let label = required(self.label, "label", ctx)?;
        let ctx = format!("field '{name}'");

        let kind: FieldType = type_name
            .parse()
            .map_err(|kind| ConfigError::UnknownFieldType {
                field: name.clone(),
                kind,
            })?;

        let (min_value, min_is_int) = self.min_value.as_ref().map(split_number).unzip();
        let (max_value, max_is_int) = self.max_value.as_ref().map(split_number).unzip();

        let mut spec = FieldSpec::new(name, kind, label)
            .required(self.required.unwrap_or(false))
            .with_range(min_value, max_value)
            .with_options(self.options.unwrap_or_default());
        spec.default_value = self.default_value;
        spec.placeholder = self.placeholder;
        spec.tooltip = self.tooltip;
        spec.width = dimension(self.width, "width", &ctx)?;
        spec.height = dimension(self.height, "height", &ctx)?;

        if kind == FieldType::Number && min_is_int == Some(true) && max_is_int == Some(true) {
            spec.numeric = Some(NumericKind::Integer);
        }

        if self.format_string.is_some() && !spec.is_real() {
            warn!(field = %spec.name, kind = %kind, "format_string ignored on non-real field");
        } else {
            spec.format_string = self.format_string;
        }

        validate::check_field(&spec)?;
        Ok(spec)
    }
}

impl RawTab {
    /// Without a top-level `fields` array, entries are inline definitions
    /// appended to `fields`; otherwise they are field names.
    fn into_spec(
        self,
        index: usize,
        has_main_fields: bool,
        fields: &mut Vec<FieldSpec>,
    ) -> Result<TabSpec, ConfigError> {
        let ctx = format!("tabs[{index}]");
        let name = required(self.name, "name", &ctx)?;
        let title = required(self.title, "title", &ctx)?;
        let entries = required(self.fields, "fields", &ctx)?;

        let mut names = Vec::with_capacity(entries.len());
        for (j, entry) in entries.into_iter().enumerate() {
            let entry_ctx = format!("{ctx}.fields[{j}]");
            match (has_main_fields, entry) {
                (true, RawTabEntry::Name(field_name)) => names.push(field_name),
                (false, RawTabEntry::Definition(definition)) => {
                    let field = definition.into_spec(&entry_ctx)?;
                    names.push(field.name.clone());
                    fields.push(field);
                }
                (true, RawTabEntry::Definition(_)) => {
                    return Err(ConfigError::Shape {
                        context: entry_ctx,
                        expected: "a field name",
                    })
                }
                (false, RawTabEntry::Name(_)) => {
                    return Err(ConfigError::Shape {
                        context: entry_ctx,
                        expected: "a field definition object",
                    })
                }
            }
        }

        Ok(TabSpec {
            layout: parse_layout(self.layout, &ctx)?.unwrap_or_default(),
            enabled: self.enabled.unwrap_or(true),
            tooltip: self.tooltip,
            name,
            title,
            fields: names,
        })
    }
}

impl RawButton {
    fn into_spec(self, ctx: &str) -> Result<ButtonSpec, ConfigError> {
        Ok(ButtonSpec {
            name: required(self.name, "name", ctx)?,
            label: required(self.label, "label", ctx)?,
            tooltip: self.tooltip,
            style: self.style,
            icon: self.icon,
            enabled: self.enabled.unwrap_or(true),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn required<T>(value: Option<T>, key: &'static str, ctx: &str) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingKey {
        context: ctx.to_owned(),
        key,
    })
}

fn parse_layout(layout: Option<String>, ctx: &str) -> Result<Option<LayoutKind>, ConfigError> {
    layout
        .map(|layout| {
            layout.parse().map_err(|layout| ConfigError::UnsupportedLayout {
                context: ctx.to_owned(),
                layout,
            })
        })
        .transpose()
}

/// The value as a float and whether it was written as a JSON integer.
fn split_number(n: &Number) -> (f64, bool) {
    let is_int = n.is_i64() || n.is_u64();
    (n.as_f64().unwrap_or(f64::NAN), is_int)
}

/// A positive size that fits in 32 bits.
fn dimension(value: Option<i64>, key: &'static str, ctx: &str) -> Result<Option<u32>, ConfigError> {
    let Some(n) = value else {
        return Ok(None);
    };
    if n <= 0 {
        return Err(ConfigError::InvalidDimension {
            context: ctx.to_owned(),
            dimension: key,
            value: n,
        });
    }
    u32::try_from(n).map(Some).map_err(|_| ConfigError::Shape {
        context: format!("{ctx}.{key}"),
        expected: "an integer that fits in 32 bits",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn load_json(value: Value) -> Result<FormConfig, ConfigError> {
        load_from_value(&value)
    }

    // ── Defaults ─────────────────────────────────────────────────────

    #[test]
    fn minimal_document_gets_defaults() {
        let config = load_json(json!({
            "fields": [{"name": "name", "type": "text", "label": "Name"}]
        }))
        .unwrap();

        assert_eq!(config.window, WindowSpec::default());
        assert_eq!(config.layout, LayoutKind::Vertical);
        assert!(config.submit_button);
        assert!(config.cancel_button);
        assert!(!config.use_tabs);
        assert_eq!(config.fields.len(), 1);
        assert!(!config.fields[0].required);
    }

    #[test]
    fn explicit_top_level_values() {
        let config = load_json(json!({
            "window": {"title": "Signup", "width": 400, "height": 300, "resizable": false},
            "layout": "form",
            "submit_button": true,
            "cancel_button": false,
            "submit_label": "Save",
            "fields": []
        }))
        .unwrap();

        assert_eq!(config.window.title, "Signup");
        assert_eq!(config.window.width, 400);
        assert!(!config.window.resizable);
        assert_eq!(config.layout, LayoutKind::Form);
        assert!(!config.cancel_button);
        assert_eq!(config.submit_label, "Save");
        assert_eq!(config.cancel_label, "Cancel");
    }

    // ── Fields ───────────────────────────────────────────────────────

    #[test]
    fn field_properties_are_read() {
        let config = load_json(json!({
            "fields": [{
                "name": "price", "type": "float", "label": "Price",
                "required": true, "default_value": 9.5, "tooltip": "USD",
                "min_value": 0.0, "max_value": 100.0, "format_string": ".3f",
                "width": 200
            }]
        }))
        .unwrap();

        let field = &config.fields[0];
        assert_eq!(field.kind, FieldType::Float);
        assert!(field.required);
        assert_eq!(field.default_value, Some(json!(9.5)));
        assert_eq!(field.tooltip.as_deref(), Some("USD"));
        assert_eq!((field.min_value, field.max_value), (Some(0.0), Some(100.0)));
        assert_eq!(field.format_string.as_deref(), Some(".3f"));
        assert_eq!(field.width, Some(200));
        assert!(field.is_real());
    }

    #[test]
    fn choices_is_an_alias_for_options() {
        let config = load_json(json!({
            "fields": [{"name": "c", "type": "combo", "label": "C", "choices": ["x", "y"]}]
        }))
        .unwrap();
        assert_eq!(config.fields[0].kind, FieldType::Select);
        assert_eq!(config.fields[0].options, vec!["x", "y"]);
    }

    #[test]
    fn number_with_integer_bounds_is_integer() {
        let config = load_json(json!({"fields": [
            {"name": "a", "type": "number", "label": "A", "min_value": 0, "max_value": 10},
            {"name": "b", "type": "number", "label": "B", "min_value": 0, "max_value": 10.5},
            {"name": "c", "type": "number", "label": "C"}
        ]}))
        .unwrap();
        assert!(config.fields[0].is_integer());
        assert!(config.fields[1].is_real());
        assert!(config.fields[2].is_real());
    }

    #[test]
    fn format_string_on_integer_field_is_dropped() {
        let config = load_json(json!({
            "fields": [{"name": "n", "type": "int", "label": "N", "format_string": "zz"}]
        }))
        .unwrap();
        assert_eq!(config.fields[0].format_string, None);
    }

    #[test]
    fn missing_field_key_is_reported_with_position() {
        let err = load_json(json!({"fields": [{"name": "a", "type": "text"}]})).unwrap_err();
        assert_eq!(err.to_string(), "fields[0]: missing required key 'label'");
    }

    #[test]
    fn unknown_field_type() {
        let err = load_json(json!({
            "fields": [{"name": "a", "type": "slider", "label": "A"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFieldType { kind, .. } if kind == "slider"));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        let err = load_json(json!({"window": {"width": 0}, "fields": []})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDimension { dimension: "width", .. }));

        let err = load_json(json!({
            "fields": [{"name": "a", "type": "text", "label": "A", "height": -4}]
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDimension { value: -4, .. }));
    }

    #[test]
    fn unsupported_layout() {
        let err = load_json(json!({"layout": "diagonal", "fields": []})).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedLayout { .. }));
    }

    #[test]
    fn duplicate_field_names_fail_the_whole_load() {
        let err = load_json(json!({"fields": [
            {"name": "a", "type": "text", "label": "A"},
            {"name": "a", "type": "int", "label": "A again"}
        ]}))
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateField(name) if name == "a"));
    }

    #[test]
    fn per_field_errors_win_over_cross_field_errors() {
        // Both a duplicate and an empty-options field: the per-field pass runs first.
        let err = load_json(json!({"fields": [
            {"name": "a", "type": "text", "label": "A"},
            {"name": "a", "type": "text", "label": "A"},
            {"name": "s", "type": "select", "label": "S"}
        ]}))
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyOptions(_)));
    }

    #[test]
    fn wrongly_typed_value_is_invalid() {
        let err = load_json(json!({
            "fields": [{"name": "a", "type": "text", "label": "A", "required": "yes"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().starts_with("configuration: invalid type"));
    }

    #[test]
    fn null_values_fall_back_to_defaults() {
        let config = load_json(json!({
            "layout": null,
            "submit_label": null,
            "fields": [{"name": "a", "type": "text", "label": "A", "default_value": null}]
        }))
        .unwrap();
        assert_eq!(config.layout, LayoutKind::Vertical);
        assert_eq!(config.submit_label, "Submit");
        assert_eq!(config.fields[0].default_value, None);
    }

    #[test]
    fn unsigned_bounds_count_as_integers() {
        let config = load_json(json!({"fields": [
            {"name": "a", "type": "number", "label": "A", "min_value": 0, "max_value": u64::MAX}
        ]}))
        .unwrap();
        assert!(config.fields[0].is_integer());
    }

    // ── Tabs ─────────────────────────────────────────────────────────

    #[test]
    fn tabs_reference_top_level_fields() {
        let config = load_json(json!({
            "fields": [
                {"name": "a", "type": "text", "label": "A"},
                {"name": "b", "type": "text", "label": "B"}
            ],
            "tabs": [{"name": "main", "title": "Main", "fields": ["b", "a"], "layout": "grid"}]
        }))
        .unwrap();
        assert!(config.use_tabs);
        assert_eq!(config.tabs[0].fields, vec!["b", "a"]);
        assert_eq!(config.tabs[0].layout, LayoutKind::Grid);
        assert!(config.tabs[0].enabled);
    }

    #[test]
    fn tabs_with_inline_fields() {
        let config = load_json(json!({
            "use_tabs": true,
            "tabs": [
                {"name": "one", "title": "One", "fields": [
                    {"name": "x", "type": "text", "label": "X"}
                ]},
                {"name": "two", "title": "Two", "fields": [
                    {"name": "y", "type": "checkbox", "label": "Y"}
                ]}
            ]
        }))
        .unwrap();
        let names: Vec<_> = config.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(config.tabs[1].fields, vec!["y"]);
    }

    #[test]
    fn inline_definitions_are_rejected_next_to_top_level_fields() {
        let err = load_json(json!({
            "fields": [],
            "tabs": [{"name": "t", "title": "T", "fields": [{"name": "x"}]}]
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "tabs[0].fields[0]: expected a field name");
    }

    #[test]
    fn tab_referencing_unknown_field() {
        let err = load_json(json!({
            "fields": [{"name": "a", "type": "text", "label": "A"}],
            "tabs": [{"name": "t", "title": "T", "fields": ["nope"]}]
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTabField { .. }));
    }

    #[test]
    fn field_listed_by_two_tabs_fails_the_load() {
        let err = load_json(json!({
            "fields": [{"name": "a", "type": "text", "label": "A"}],
            "tabs": [
                {"name": "t", "title": "T", "fields": ["a"]},
                {"name": "u", "title": "U", "fields": ["a"]}
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::RepeatedTabField { tab, .. } if tab == "u"));
    }

    // ── Buttons ──────────────────────────────────────────────────────

    #[test]
    fn custom_buttons() {
        let config = load_json(json!({
            "fields": [],
            "custom_buttons": [
                {"name": "reset", "label": "Reset", "style": "color: red"},
                {"name": "help", "label": "Help", "enabled": false}
            ]
        }))
        .unwrap();
        assert_eq!(config.custom_buttons.len(), 2);
        assert_eq!(config.custom_buttons[0].style.as_deref(), Some("color: red"));
        assert!(config.custom_buttons[0].enabled);
        assert!(!config.custom_buttons[1].enabled);
    }

    #[test]
    fn button_missing_label() {
        let err = load_json(json!({"fields": [], "custom_buttons": [{"name": "x"}]})).unwrap_err();
        assert_eq!(err.to_string(), "custom_buttons[0]: missing required key 'label'");
    }

    // ── Sources ──────────────────────────────────────────────────────

    #[test]
    fn invalid_json_text() {
        let err = load_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file() {
        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        fs::write(&path, r#"{"fields": [{"name": "a", "type": "email", "label": "A"}]}"#).unwrap();
        let config = load(path.as_path()).unwrap();
        assert_eq!(config.fields[0].kind, FieldType::Email);
    }
}
