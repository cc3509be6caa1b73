//! Value coercion shared by every backend.
//!
//! Backends store values in the semantic type of their field and go through
//! these functions for defaults, clearing and writes, so the same input
//! produces the same stored value regardless of the backend.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::{Number, Value};
use tracing::warn;

use crate::config::{FieldSpec, FieldType};

/// Bounds of integer fields without `min_value`/`max_value`.
pub const INT_MIN: i64 = -2_147_483_648;
pub const INT_MAX: i64 = 2_147_483_647;
/// Bounds of real fields without `min_value`/`max_value`.
pub const REAL_MIN: f64 = -999_999_999.0;
pub const REAL_MAX: f64 = 999_999_999.0;
/// Bounds of range sliders without `min_value`/`max_value`.
pub const RANGE_MIN: i64 = 0;
pub const RANGE_MAX: i64 = 100;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Color of a color field that was never set.
pub const DEFAULT_COLOR: &str = "#ffffff";

// ---------------------------------------------------------------------------
// Initial and empty values
// ---------------------------------------------------------------------------

/// Value a freshly created widget holds: the coerced default, or the empty
/// value when there is no usable default.
pub fn initial_value(field: &FieldSpec) -> Value {
    match &field.default_value {
        Some(default) => match coerce(field, default) {
            Ok(value) => value,
            Err(reason) => {
                warn!(field = %field.name, %reason, "default_value ignored");
                empty_value(field)
            }
        },
        None => empty_value(field),
    }
}

/// Value a widget holds after being cleared.
///
/// Numbers reset to zero (clamped into range), sliders to their minimum,
/// selects to their first option, temporal fields to the current local time.
pub fn empty_value(field: &FieldSpec) -> Value {
    match field.kind {
        FieldType::Text
        | FieldType::Password
        | FieldType::Email
        | FieldType::Url
        | FieldType::Textarea
        | FieldType::File => Value::String(String::new()),
        FieldType::Checkbox => Value::Bool(false),
        FieldType::Range => Value::from(integer_bounds(field).0),
        FieldType::Int | FieldType::Float | FieldType::Number => {
            if field.is_integer() {
                let (min, max) = integer_bounds(field);
                Value::from(0i64.clamp(min, max))
            } else {
                let (min, max) = real_bounds(field);
                real(0f64.clamp(min, max))
            }
        }
        FieldType::Select => field
            .options
            .first()
            .map(|o| Value::String(o.clone()))
            .unwrap_or(Value::Null),
        FieldType::Radio => Value::Null,
        FieldType::Date => Value::String(Local::now().date_naive().format(DATE_FORMAT).to_string()),
        FieldType::Time => Value::String(Local::now().time().format(TIME_FORMAT).to_string()),
        FieldType::Datetime => {
            Value::String(Local::now().naive_local().format(DATETIME_FORMAT).to_string())
        }
        FieldType::Color => Value::String(DEFAULT_COLOR.to_owned()),
    }
}

/// Whether a value counts as missing for a required field.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Effective integer bounds, falling back to the per-type defaults.
pub fn integer_bounds(field: &FieldSpec) -> (i64, i64) {
    let (default_min, default_max) = match field.kind {
        FieldType::Range => (RANGE_MIN, RANGE_MAX),
        _ => (INT_MIN, INT_MAX),
    };
    let min = field.min_value.map_or(default_min, |m| m.ceil() as i64);
    let max = field.max_value.map_or(default_max, |m| m.floor() as i64);
    (min, max.max(min))
}

/// Effective real bounds, falling back to the per-type defaults.
pub fn real_bounds(field: &FieldSpec) -> (f64, f64) {
    let min = field.min_value.unwrap_or(REAL_MIN);
    let max = field.max_value.unwrap_or(REAL_MAX);
    (min, max.max(min))
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Convert `value` into the stored representation for `field`.
///
/// Numbers are clamped into the field's bounds. Returns a human-readable
/// reason when the value cannot represent the field's type.
pub fn coerce(field: &FieldSpec, value: &Value) -> Result<Value, String> {
    match field.kind {
        FieldType::Text
        | FieldType::Password
        | FieldType::Email
        | FieldType::Url
        | FieldType::Textarea
        | FieldType::File => text(value).map(Value::String),
        FieldType::Checkbox => boolean(value).map(Value::Bool),
        FieldType::Int | FieldType::Float | FieldType::Number | FieldType::Range => {
            let number = number(value)?;
            if field.is_integer() {
                let (min, max) = integer_bounds(field);
                Ok(Value::from(clamp_integer(number.trunc(), min, max)))
            } else {
                let (min, max) = real_bounds(field);
                Ok(real(number.clamp(min, max)))
            }
        }
        FieldType::Select => choice(field, value).map(Value::String),
        FieldType::Radio => match value {
            Value::Null => Ok(Value::Null),
            _ => choice(field, value).map(Value::String),
        },
        FieldType::Date => parse_date(&scalar(value)?)
            .map(|d| Value::String(d.format(DATE_FORMAT).to_string())),
        FieldType::Time => parse_time(&scalar(value)?)
            .map(|t| Value::String(t.format(TIME_FORMAT).to_string())),
        FieldType::Datetime => parse_datetime(&scalar(value)?)
            .map(|dt| Value::String(dt.format(DATETIME_FORMAT).to_string())),
        FieldType::Color => parse_color(&scalar(value)?).map(Value::String),
    }
}

pub(crate) fn real(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn clamp_integer(value: f64, min: i64, max: i64) -> i64 {
    if value <= min as f64 {
        min
    } else if value >= max as f64 {
        max
    } else {
        value as i64
    }
}

fn text(value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Array(_) | Value::Object(_) => Err("expected text".to_owned()),
    }
}

/// A non-null scalar rendered as a string.
fn scalar(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.trim().to_owned()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(format!("expected a string, got {value}")),
    }
}

fn boolean(value: &Value) -> Result<bool, String> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "checked" => Ok(true),
            "false" | "0" | "no" | "off" | "" => Ok(false),
            other => Err(format!("'{other}' is not a boolean")),
        },
        _ => Err("expected a boolean".to_owned()),
    }
}

fn number(value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| format!("expected a number, got {value}"))
}

fn choice(field: &FieldSpec, value: &Value) -> Result<String, String> {
    let wanted = scalar(value)?;
    field
        .options
        .iter()
        .find(|o| **o == wanted)
        .cloned()
        .ok_or_else(|| format!("'{wanted}' is not one of the options"))
}

// ---------------------------------------------------------------------------
// Temporal and color parsing
// ---------------------------------------------------------------------------

/// `YYYY-MM-DD`, or the date part of a datetime.
pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .or_else(|_| parse_datetime(text).map(|dt| dt.date()))
        .map_err(|_| format!("'{text}' is not a date (YYYY-MM-DD)"))
}

/// `HH:MM:SS`, `HH:MM`, or with fractional seconds.
pub fn parse_time(text: &str) -> Result<NaiveTime, String> {
    ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(text, f).ok())
        .map(|t| t.with_nanosecond(0).unwrap_or(t))
        .ok_or_else(|| format!("'{text}' is not a time (HH:MM:SS)"))
}

/// ISO-8601 local datetime, RFC 3339 with offset, or a bare date at midnight.
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.with_nanosecond(0).unwrap_or(dt))
        .ok_or_else(|| format!("'{text}' is not a datetime (YYYY-MM-DDTHH:MM:SS)"))
}

/// `#rrggbb`, `#rgb` or a basic color name, normalized to lowercase `#rrggbb`.
pub fn parse_color(text: &str) -> Result<String, String> {
    let lower = text.trim().to_ascii_lowercase();
    let hex = match lower.as_str() {
        "white" => "ffffff",
        "black" => "000000",
        "red" => "ff0000",
        "green" => "008000",
        "lime" => "00ff00",
        "blue" => "0000ff",
        "yellow" => "ffff00",
        "cyan" => "00ffff",
        "magenta" => "ff00ff",
        "gray" | "grey" => "808080",
        "orange" => "ffa500",
        "purple" => "800080",
        other => other.strip_prefix('#').unwrap_or(""),
    };

    let valid = hex.bytes().all(|b| b.is_ascii_hexdigit());
    match hex.len() {
        6 if valid => Ok(format!("#{hex}")),
        3 if valid => Ok(hex.chars().fold(String::from("#"), |mut s, c| {
            s.push(c);
            s.push(c);
            s
        })),
        _ => Err(format!("'{text}' is not a color (#rrggbb)")),
    }
}
