//! Headless helpers for exercising forms without a terminal.
//!
//! [`FormPilot`] drives a [`FormApp`](crate::app::FormApp) with synthetic key
//! presses. The snapshot functions turn widget output or whole frames into
//! plain text for assertions and `insta` snapshots.

pub mod pilot;
pub mod snapshot;

pub use pilot::FormPilot;
pub use snapshot::{compositor_to_string, render_to_string, render_to_styled_string, strips_to_string};
