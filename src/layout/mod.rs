//! Field arrangement on top of taffy.

pub mod engine;

pub use engine::{Arrangement, ItemRegions, LayoutEngine, LayoutError, LayoutItem};
