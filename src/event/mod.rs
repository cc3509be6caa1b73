//! Input events and key bindings.

pub mod binding;
pub mod input;

pub use binding::{BindingAction, KeyBindingRegistry};
pub use input::{InputEvent, Key, KeyEvent, Modifiers};
