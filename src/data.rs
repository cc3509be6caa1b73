//! Reading and writing form data files.
//!
//! Data files are JSON objects, flat or nested. A `_metadata` block describing
//! the form may be present; it is never treated as field data.

use std::fs;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::codec::FormData;
use crate::config::FormConfig;
use crate::error::FormError;

/// Key of the metadata block.
pub const METADATA_KEY: &str = "_metadata";

/// Description of the form that produced a data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub config_source: String,
    pub window_title: String,
    pub layout: String,
    pub field_count: usize,
    pub required_fields: Vec<String>,
    /// Local time, `YYYY-MM-DDTHH:MM:SS`.
    pub generated_at: String,
}

impl Metadata {
    /// Metadata for `config`, stamped with the current local time.
    pub fn for_config(config: &FormConfig) -> Self {
        Self {
            config_source: env!("CARGO_PKG_NAME").to_owned(),
            window_title: config.window.title.clone(),
            layout: config.layout.to_string(),
            field_count: config.fields.len(),
            required_fields: config
                .required_fields()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            generated_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

/// Remove and return the metadata block, if any.
pub fn strip_metadata(data: &mut FormData) -> Option<Value> {
    data.shift_remove(METADATA_KEY)
}

/// `data` followed by a metadata block.
pub fn with_metadata(data: &FormData, metadata: &Metadata) -> Result<FormData, FormError> {
    let mut out = data.clone();
    out.insert(METADATA_KEY.to_owned(), serde_json::to_value(metadata)?);
    Ok(out)
}

/// Drop null and blank-string values, recursing into mappings. Mappings left
/// empty by the filter are dropped too.
pub fn drop_empty(data: &FormData) -> FormData {
    data.iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::Object(inner) if !inner.is_empty() => {
                let filtered = drop_empty(inner);
                (!filtered.is_empty()).then(|| (key.clone(), Value::Object(filtered)))
            }
            _ => Some((key.clone(), value.clone())),
        })
        .collect()
}

/// Read a data file, discarding its metadata block.
pub fn read_data(path: impl AsRef<Path>) -> Result<FormData, FormError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| FormError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data: FormData = serde_json::from_str(&text)?;
    if strip_metadata(&mut data).is_some() {
        debug!(path = %path.display(), "ignored metadata block");
    }
    info!(path = %path.display(), keys = data.len(), "form data read");
    Ok(data)
}

/// Write `data` as pretty-printed JSON.
pub fn write_data(path: impl AsRef<Path>, data: &FormData) -> Result<(), FormError> {
    let path = path.as_ref();
    let mut text = serde_json::to_string_pretty(data)?;
    text.push('\n');
    fs::write(path, text).map_err(|source| FormError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), keys = data.len(), "form data written");
    Ok(())
}
