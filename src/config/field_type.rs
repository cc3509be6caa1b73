//! Field type registry: the closed set of field kinds and their properties.

use std::fmt;
use std::str::FromStr;

/// Every field kind a form can declare.
///
/// Parsing accepts the canonical lowercase names plus the legacy aliases
/// `check` (checkbox), `combo` (select) and `spin` (int).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Password,
    Email,
    Url,
    Int,
    Float,
    Number,
    Textarea,
    Checkbox,
    Radio,
    Select,
    Date,
    Time,
    Datetime,
    Range,
    File,
    Color,
}

impl FieldType {
    /// All registered kinds, in documentation order.
    pub const ALL: [FieldType; 17] = [
        FieldType::Text,
        FieldType::Password,
        FieldType::Email,
        FieldType::Url,
        FieldType::Int,
        FieldType::Float,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Select,
        FieldType::Date,
        FieldType::Time,
        FieldType::Datetime,
        FieldType::Range,
        FieldType::File,
        FieldType::Color,
    ];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Password => "password",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Select => "select",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
            FieldType::Range => "range",
            FieldType::File => "file",
            FieldType::Color => "color",
        }
    }

    /// Kinds that honor `min_value`/`max_value`.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldType::Int | FieldType::Float | FieldType::Number | FieldType::Range
        )
    }

    /// Kinds that require a non-empty `options` list.
    pub fn is_choice(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "text" => FieldType::Text,
            "password" => FieldType::Password,
            "email" => FieldType::Email,
            "url" => FieldType::Url,
            "int" | "spin" => FieldType::Int,
            "float" => FieldType::Float,
            "number" => FieldType::Number,
            "textarea" => FieldType::Textarea,
            "checkbox" | "check" => FieldType::Checkbox,
            "radio" => FieldType::Radio,
            "select" | "combo" => FieldType::Select,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            "datetime" => FieldType::Datetime,
            "range" => FieldType::Range,
            "file" => FieldType::File,
            "color" => FieldType::Color,
            _ => return Err(s.to_owned()),
        };
        Ok(kind)
    }
}
