//! Form definitions: field type registry, model types, loading and validation.

pub mod field_type;
pub mod loader;
pub mod model;
pub mod validate;

pub use field_type::FieldType;
pub use loader::{load, load_from_file, load_from_str, load_from_value, ConfigSource};
pub use model::{
    ButtonSpec, FieldSpec, FormConfig, LayoutKind, NumericKind, TabSpec, WindowSpec,
};
