//! logos-based tokenizer for style declaration strings.
//!
//! Longest match wins, so `#4caf50` lexes as [`Token::HexColor`] and `12px` as
//! a single [`Token::Number`].

use logos::Logos;

/// Token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// `#rgb`, `#rrggbb`, `#rrggbbaa`.
    #[regex(r"#[0-9a-fA-F]{3,8}")]
    HexColor,

    /// Integer or decimal, optionally suffixed with `px`.
    #[regex(r"-?[0-9]+(\.[0-9]+)?(px)?")]
    Number,

    /// Property names, keywords and color names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    StringLiteral,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,
}

/// Tokenize `input` into `(token, text)` pairs. Unlexable input is skipped.
pub fn tokenize(input: &str) -> Vec<(Token, &str)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, &input[span])))
        .collect()
}
