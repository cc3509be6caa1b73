//! # gilt-forms
//!
//! Declarative forms described in JSON, rendered by interchangeable widget
//! backends.
//!
//! A form configuration lists typed fields, optional tabs, buttons and a
//! window description. [`FormController`] builds it on any [`WidgetFactory`],
//! then collects and applies values as JSON objects keyed by field name.
//! Dotted names (`user.email`) become nested objects in collected data.
//!
//! ```
//! use gilt_forms::{config, FormController, HeadlessBackend};
//! use serde_json::json;
//!
//! let form = config::load_from_value(&json!({
//!     "window": {"title": "Account"},
//!     "fields": [
//!         {"name": "user.email", "type": "email", "label": "Email", "required": true},
//!         {"name": "newsletter", "type": "checkbox", "label": "Newsletter"}
//!     ]
//! }))
//! .unwrap();
//!
//! let mut form = FormController::with_config(HeadlessBackend::new(), form).unwrap();
//! assert!(form.collect().is_err());
//!
//! form.set_field_value("user.email", &json!("ada@example.com")).unwrap();
//! let data = form.collect().unwrap();
//! assert_eq!(data["user"]["email"], json!("ada@example.com"));
//! assert_eq!(data["newsletter"], json!(false));
//! ```
//!
//! ## Modules
//!
//! - **[`config`]**: field type registry, configuration model, loader and validation
//! - **[`codec`]**: flat dotted keys to nested objects and back
//! - **[`controller`]**: the form lifecycle, data collection and callbacks
//! - **[`backend`]**: the [`WidgetFactory`] contract, headless and terminal backends
//! - **[`data`]**: form data files and metadata
//! - **[`app`]**: running a form interactively in the terminal
//! - **[`widgets`]**, **[`screen`]**, **[`layout`]**, **[`render`]**: terminal presentation
//! - **[`testing`]**: headless pilot and snapshot helpers

// Forms
pub mod codec;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod format;

// Backends
pub mod backend;

// Terminal presentation
pub mod css;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod screen;
pub mod widget;
pub mod widgets;

// Application
pub mod app;
pub mod testing;

pub use app::{run_form, AppConfig, FormApp, FormResult};
pub use backend::{BackendKind, HeadlessBackend, TerminalBackend, WidgetFactory, WidgetHandle};
pub use codec::FormData;
pub use config::{FieldSpec, FieldType, FormConfig};
pub use controller::{FormController, FormState};
pub use error::{ConfigError, FormError, UnsupportedFieldTypeError, ValidationError};
