//! Parse declaration strings such as `background-color: #4CAF50; color: white`.
//!
//! Used for custom button `style` strings. The parser is lenient: unknown
//! properties and malformed values are skipped, and a surrounding
//! `Selector { ... }` block is unwrapped.

use tracing::debug;

use super::styles::{Styles, TextAlign, TextStyleFlags};
use super::tokenizer::{tokenize, Token};

/// Parse `input` into [`Styles`].
pub fn parse_declarations(input: &str) -> Styles {
    let tokens = tokenize(input);
    let body = match tokens.iter().position(|(t, _)| *t == Token::BraceOpen) {
        Some(open) => {
            let rest = &tokens[open + 1..];
            let close = rest
                .iter()
                .position(|(t, _)| *t == Token::BraceClose)
                .unwrap_or(rest.len());
            &rest[..close]
        }
        None => &tokens[..],
    };

    let mut styles = Styles::new();
    for declaration in body.split(|(t, _)| *t == Token::Semicolon) {
        match declaration {
            [] => {}
            [(Token::Ident, property), (Token::Colon, _), value @ ..] if !value.is_empty() => {
                apply(&mut styles, &property.to_ascii_lowercase(), value);
            }
            other => debug!(?other, "skipped malformed declaration"),
        }
    }
    styles
}

fn apply(styles: &mut Styles, property: &str, value: &[(Token, &str)]) {
    match property {
        "color" => styles.color = color(value),
        "background" | "background-color" => styles.background = color(value),
        "text-align" => styles.text_align = keyword(value).and_then(align),
        "font-weight" => {
            let bold = match value {
                [(Token::Ident, word)] => Some(word.eq_ignore_ascii_case("bold")),
                [(Token::Number, n)] => n.parse::<u32>().ok().map(|w| w >= 600),
                _ => None,
            };
            set_flag(styles, |f| f.bold = bold);
        }
        "font-style" => {
            let italic = keyword(value).map(|w| w == "italic" || w == "oblique");
            set_flag(styles, |f| f.italic = italic);
        }
        "text-decoration" => {
            for word in keywords(value) {
                match word.as_str() {
                    "underline" => set_flag(styles, |f| f.underline = Some(true)),
                    "line-through" => set_flag(styles, |f| f.strikethrough = Some(true)),
                    _ => {}
                }
            }
        }
        "text-style" => {
            for word in keywords(value) {
                match word.as_str() {
                    "bold" => set_flag(styles, |f| f.bold = Some(true)),
                    "dim" => set_flag(styles, |f| f.dim = Some(true)),
                    "italic" => set_flag(styles, |f| f.italic = Some(true)),
                    "underline" => set_flag(styles, |f| f.underline = Some(true)),
                    "strike" | "strikethrough" => {
                        set_flag(styles, |f| f.strikethrough = Some(true))
                    }
                    "reverse" => set_flag(styles, |f| f.reverse = Some(true)),
                    _ => {}
                }
            }
        }
        other => debug!(property = other, "unsupported style property"),
    }
}

fn set_flag(styles: &mut Styles, set: impl FnOnce(&mut TextStyleFlags)) {
    let mut flags = styles.text_style.unwrap_or_default();
    set(&mut flags);
    styles.text_style = Some(flags);
}

fn keyword(value: &[(Token, &str)]) -> Option<String> {
    match value {
        [(Token::Ident, word)] => Some(word.to_ascii_lowercase()),
        _ => None,
    }
}

fn keywords(value: &[(Token, &str)]) -> Vec<String> {
    value
        .iter()
        .filter(|(t, _)| *t == Token::Ident)
        .map(|(_, w)| w.to_ascii_lowercase())
        .collect()
}

fn align(word: String) -> Option<TextAlign> {
    match word.as_str() {
        "left" => Some(TextAlign::Left),
        "center" => Some(TextAlign::Center),
        "right" => Some(TextAlign::Right),
        _ => None,
    }
}

/// A hex color, a color name, or `rgb(r, g, b)` as `#rrggbb`.
fn color(value: &[(Token, &str)]) -> Option<String> {
    match value {
        [(Token::HexColor, hex)] => Some(hex.to_ascii_lowercase()),
        [(Token::Ident, name)] => Some(name.to_ascii_lowercase()),
        [(Token::Ident, func), (Token::ParenOpen, _), args @ .., (Token::ParenClose, _)]
            if func.eq_ignore_ascii_case("rgb") =>
        {
            let channels: Vec<u8> = args
                .iter()
                .filter(|(t, _)| *t == Token::Number)
                .map(|(_, n)| n.trim_end_matches("px").parse::<f64>().ok())
                .map(|n| n.map(|n| n.clamp(0.0, 255.0).round() as u8))
                .collect::<Option<_>>()?;
            match channels[..] {
                [r, g, b] => Some(format!("#{r:02x}{g:02x}{b:02x}")),
                _ => None,
            }
        }
        _ => None,
    }
}
