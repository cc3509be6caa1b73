//! Built-in terminal widgets.

pub mod button;
pub mod checkbox;
pub mod choice;
pub mod footer;
pub mod header;
pub mod label;
pub mod number;
pub mod slider;
pub mod tab_bar;
pub mod text_input;

pub use button::Button;
pub use checkbox::Checkbox;
pub use choice::{Choice, ChoiceStyle};
pub use footer::Footer;
pub use header::Header;
pub use label::Label;
pub use number::NumberInput;
pub use slider::Slider;
pub use tab_bar::TabBar;
pub use text_input::TextInput;

/// `text` cut to `width` characters.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// `text` centered in `width` columns, truncated when wider.
pub(crate) fn center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let len = text.chars().count();
    let left = (width - len) / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(width - len - left))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_pads_both_sides() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("abc", 6), " abc  ");
        assert_eq!(center("abcdefgh", 4), "abcd");
    }
}
