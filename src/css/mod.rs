//! Style declarations: tokenizer, parser and resolved styles.

pub mod declarations;
pub mod styles;
pub mod tokenizer;

pub use declarations::parse_declarations;
pub use styles::{Styles, TextAlign, TextStyleFlags};
