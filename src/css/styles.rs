//! Resolved visual styles for widgets and buttons.
//!
//! Every property is an `Option<T>`; `None` means "not set" and falls back to
//! whatever lies underneath when styles are merged.

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Text attribute flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyleFlags {
    pub bold: Option<bool>,
    pub dim: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub reverse: Option<bool>,
}

impl TextStyleFlags {
    fn merge(&self, other: &TextStyleFlags) -> TextStyleFlags {
        TextStyleFlags {
            bold: other.bold.or(self.bold),
            dim: other.dim.or(self.dim),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            strikethrough: other.strikethrough.or(self.strikethrough),
            reverse: other.reverse.or(self.reverse),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Styles {
    /// Foreground color, a name or `#rrggbb`.
    pub color: Option<String>,
    pub background: Option<String>,
    pub text_align: Option<TextAlign>,
    pub text_style: Option<TextStyleFlags>,
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    /// Set one attribute through a closure over the flags.
    pub fn with_flags(mut self, set: impl FnOnce(&mut TextStyleFlags)) -> Self {
        let mut flags = self.text_style.unwrap_or_default();
        set(&mut flags);
        self.text_style = Some(flags);
        self
    }

    /// `other` layered on top of `self`: every property `other` sets wins.
    pub fn merge(&self, other: &Styles) -> Styles {
        Styles {
            color: other.color.clone().or_else(|| self.color.clone()),
            background: other.background.clone().or_else(|| self.background.clone()),
            text_align: other.text_align.or(self.text_align),
            text_style: match (&self.text_style, &other.text_style) {
                (Some(base), Some(top)) => Some(base.merge(top)),
                (base, top) => (*top).or(*base),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.background.is_none()
            && self.text_align.is_none()
            && self.text_style.is_none()
    }
}
