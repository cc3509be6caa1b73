//! Error taxonomy for loading configurations, driving backends, and collecting data.
//!
//! Every error is a typed enum deriving [`thiserror::Error`]. Configuration
//! problems surface as [`ConfigError`] and are always fatal to loading.
//! Required-field problems at collect time surface as [`ValidationError`], which
//! the caller can recover from by fixing inputs and collecting again.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::FieldType;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A malformed or invalid form configuration, or a nested-key collision.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A JSON value has the wrong shape (e.g. a string where an object was expected).
    #[error("{context}: expected {expected}")]
    Shape {
        context: String,
        expected: &'static str,
    },

    /// A value does not deserialize into the expected type.
    #[error("{context}: {source}")]
    Invalid {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required key is absent.
    #[error("{context}: missing required key '{key}'")]
    MissingKey {
        context: String,
        key: &'static str,
    },

    /// A field declares a type outside the registry.
    #[error("field '{field}': unknown field type '{kind}'")]
    UnknownFieldType { field: String, kind: String },

    /// The `layout` value is not one of vertical/horizontal/grid/form.
    #[error("{context}: unsupported layout '{layout}'")]
    UnsupportedLayout { context: String, layout: String },

    /// Field name is empty or has an empty dotted segment.
    #[error("field name '{0}' is empty or has an empty segment")]
    EmptyFieldName(String),

    #[error("duplicate field name '{0}'")]
    DuplicateField(String),

    #[error("duplicate tab name '{0}'")]
    DuplicateTab(String),

    #[error("duplicate button name '{0}'")]
    DuplicateButton(String),

    /// A select or radio field has no options.
    #[error("field '{0}': choice fields need at least one option")]
    EmptyOptions(String),

    #[error("field '{field}': min_value {min} is greater than max_value {max}")]
    InvertedRange { field: String, min: f64, max: f64 },

    /// A window or widget size hint is zero or negative.
    #[error("{context}: {dimension} must be positive, got {value}")]
    InvalidDimension {
        context: String,
        dimension: &'static str,
        value: i64,
    },

    #[error("field '{field}': invalid format string '{format}'")]
    InvalidFormatString { field: String, format: String },

    #[error("tab '{tab}' references unknown field '{field}'")]
    UnknownTabField { tab: String, field: String },

    /// Tabs partition the fields: no field may be listed twice.
    #[error("tab '{tab}' lists field '{field}', which is already in a tab")]
    RepeatedTabField { tab: String, field: String },

    /// `use_tabs` is set but no tabs were declared.
    #[error("use_tabs is set but no tabs are defined")]
    MissingTabs,

    /// A dotted path passes through or lands on a value of the wrong shape.
    #[error("nested key '{path}' collides with an existing value")]
    KeyCollision { path: String },
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Required fields left empty when collecting form data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required fields are empty: {}", missing.join(", "))]
pub struct ValidationError {
    /// Names of every violating field, in declaration order.
    pub missing: Vec<String>,
}

// ---------------------------------------------------------------------------
// UnsupportedFieldTypeError
// ---------------------------------------------------------------------------

/// A backend has no control for the requested field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend '{backend}' cannot render field type '{kind}'")]
pub struct UnsupportedFieldTypeError {
    pub backend: &'static str,
    pub kind: FieldType,
}

// ---------------------------------------------------------------------------
// BackendError
// ---------------------------------------------------------------------------

/// An unknown backend name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend '{0}' (expected 'terminal' or 'headless')")]
pub struct BackendError(pub String);

// ---------------------------------------------------------------------------
// FormError
// ---------------------------------------------------------------------------

/// Error type returned by callbacks registered on a form.
pub type CallbackError = Box<dyn StdError + Send + Sync>;

/// Errors raised while operating a built form.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedFieldTypeError),

    /// A handle with no live widget in this backend. Handles carry no backend
    /// identity, so one issued elsewhere is only caught when its slot is free here.
    #[error("unknown widget handle {0}")]
    UnknownWidget(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("unknown button '{0}'")]
    UnknownButton(String),

    /// A value that cannot be coerced to the field's type.
    #[error("field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// An operation that requires a built form ran before `build`.
    #[error("form has not been built")]
    NotBuilt,

    #[error("form is already built")]
    AlreadyBuilt,

    /// An earlier build failed; the controller cannot be built again.
    #[error("an earlier build of this form failed")]
    BuildFailed,

    /// A user callback returned an error.
    #[error("callback for '{action}' failed: {source}")]
    Callback {
        action: String,
        #[source]
        source: CallbackError,
    },

    #[error("data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("data file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading input or drawing to the terminal failed.
    #[error("terminal: {0}")]
    Terminal(#[from] std::io::Error),
}

impl FormError {
    /// Shorthand for [`FormError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, reason: impl fmt::Display) -> Self {
        FormError::InvalidValue {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
