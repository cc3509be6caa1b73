//! Validated form definition: window, fields, tabs, buttons.
//!
//! Values of these types are produced by the loader and treated as read-only
//! afterwards. The builder methods exist for constructing definitions in code
//! (mostly in tests); they do not validate.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::field_type::FieldType;
use crate::format::FloatFormat;

// ---------------------------------------------------------------------------
// LayoutKind
// ---------------------------------------------------------------------------

/// How fields are arranged inside the form or a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutKind {
    /// Label above control, rows stacked top to bottom.
    #[default]
    Vertical,
    /// Rows side by side.
    Horizontal,
    /// Rows wrapped into two columns.
    Grid,
    /// Label column beside control column.
    Form,
}

impl LayoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::Vertical => "vertical",
            LayoutKind::Horizontal => "horizontal",
            LayoutKind::Grid => "grid",
            LayoutKind::Form => "form",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(LayoutKind::Vertical),
            "horizontal" => Ok(LayoutKind::Horizontal),
            "grid" => Ok(LayoutKind::Grid),
            "form" => Ok(LayoutKind::Form),
            _ => Err(s.to_owned()),
        }
    }
}

// ---------------------------------------------------------------------------
// NumericKind
// ---------------------------------------------------------------------------

/// Whether a numeric field holds integers or reals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Integer,
    Real,
}

// ---------------------------------------------------------------------------
// WindowSpec
// ---------------------------------------------------------------------------

/// Window title, size and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub icon: Option<String>,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            title: "GUI Application".to_owned(),
            width: 800,
            height: 600,
            resizable: true,
            icon: None,
        }
    }
}

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

/// One named, typed input definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Unique name; dots express nesting in collected data.
    pub name: String,
    pub kind: FieldType,
    pub label: String,
    pub required: bool,
    pub default_value: Option<Value>,
    pub placeholder: Option<String>,
    pub tooltip: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub options: Vec<String>,
    pub format_string: Option<String>,
    /// Width hint in pixels.
    pub width: Option<u32>,
    /// Height hint in pixels.
    pub height: Option<u32>,
    /// Resolved at load time for numeric kinds, `None` otherwise.
    pub numeric: Option<NumericKind>,
}

impl FieldSpec {
    /// A field with every optional property unset.
    pub fn new(name: impl Into<String>, kind: FieldType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            label: label.into(),
            required: false,
            default_value: None,
            placeholder: None,
            tooltip: None,
            min_value: None,
            max_value: None,
            options: Vec::new(),
            format_string: None,
            width: None,
            height: None,
            numeric: default_numeric(kind),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format_string = Some(format.into());
        self
    }

    pub fn with_numeric(mut self, numeric: NumericKind) -> Self {
        self.numeric = Some(numeric);
        self
    }

    /// Whether the field stores integers (int, range, integer-bounded number).
    pub fn is_integer(&self) -> bool {
        self.numeric == Some(NumericKind::Integer)
    }

    /// Whether the field stores reals (float, real-bounded number).
    pub fn is_real(&self) -> bool {
        self.numeric == Some(NumericKind::Real)
    }

    /// Display format for real-valued fields; two fixed decimals when unset.
    pub fn float_format(&self) -> FloatFormat {
        self.format_string
            .as_deref()
            .and_then(FloatFormat::parse)
            .unwrap_or_default()
    }
}

/// Numeric kind implied by the field type alone.
///
/// `number` fields start out real; the loader switches them to integer when
/// both bounds are given as JSON integers.
pub fn default_numeric(kind: FieldType) -> Option<NumericKind> {
    match kind {
        FieldType::Int | FieldType::Range => Some(NumericKind::Integer),
        FieldType::Float | FieldType::Number => Some(NumericKind::Real),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// TabSpec
// ---------------------------------------------------------------------------

/// A display grouping of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TabSpec {
    pub name: String,
    pub title: String,
    pub layout: LayoutKind,
    /// Field names in display order.
    pub fields: Vec<String>,
    pub enabled: bool,
    pub tooltip: Option<String>,
}

impl TabSpec {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            layout: LayoutKind::default(),
            fields: Vec::new(),
            enabled: true,
            tooltip: None,
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

// ---------------------------------------------------------------------------
// ButtonSpec
// ---------------------------------------------------------------------------

/// A user-defined action button beyond submit and cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonSpec {
    pub name: String,
    pub label: String,
    pub tooltip: Option<String>,
    /// Declarations such as `color: white; background: #2e7d32`.
    pub style: Option<String>,
    pub icon: Option<String>,
    pub enabled: bool,
}

impl ButtonSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            tooltip: None,
            style: None,
            icon: None,
            enabled: true,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

// ---------------------------------------------------------------------------
// FormConfig
// ---------------------------------------------------------------------------

/// A complete, validated form definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub window: WindowSpec,
    pub layout: LayoutKind,
    pub fields: Vec<FieldSpec>,
    pub use_tabs: bool,
    pub tabs: Vec<TabSpec>,
    pub submit_button: bool,
    pub submit_label: String,
    pub cancel_button: bool,
    pub cancel_label: String,
    pub custom_buttons: Vec<ButtonSpec>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            window: WindowSpec::default(),
            layout: LayoutKind::default(),
            fields: Vec::new(),
            use_tabs: false,
            tabs: Vec::new(),
            submit_button: true,
            submit_label: "Submit".to_owned(),
            cancel_button: true,
            cancel_label: "Cancel".to_owned(),
            custom_buttons: Vec::new(),
        }
    }
}

impl FormConfig {
    /// A vertical form with the given fields and default everything else.
    pub fn with_fields(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a custom button by name.
    pub fn button(&self, name: &str) -> Option<&ButtonSpec> {
        self.custom_buttons.iter().find(|b| b.name == name)
    }

    /// Whether fields are grouped into tabs.
    pub fn has_tabs(&self) -> bool {
        self.use_tabs && !self.tabs.is_empty()
    }

    /// Names of required fields, in declaration order.
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Fields that no tab references, in declaration order.
    pub fn untabbed_fields(&self) -> Vec<&FieldSpec> {
        self.fields
            .iter()
            .filter(|f| !self.tabs.iter().any(|t| t.fields.contains(&f.name)))
            .collect()
    }
}
