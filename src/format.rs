//! Display formats for real-valued fields.
//!
//! A field's `format_string` controls how its number is shown, never the value
//! it stores. The accepted grammar is `[width][,][.precision][type]` where type
//! is `f` (fixed, the default), `e` (exponent) or `%` (percent).

use std::fmt;

/// Notation used when rendering a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatStyle {
    Fixed,
    Exponent,
    Percent,
}

/// A parsed display format for real numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatFormat {
    pub width: Option<usize>,
    pub grouping: bool,
    pub precision: Option<usize>,
    pub style: FloatStyle,
}

impl Default for FloatFormat {
    /// Two fixed decimals.
    fn default() -> Self {
        Self {
            width: None,
            grouping: false,
            precision: Some(2),
            style: FloatStyle::Fixed,
        }
    }
}

impl FloatFormat {
    /// Precision used when a type is given without an explicit precision.
    pub const DEFAULT_PRECISION: usize = 6;

    /// Parse a format spec such as `.2f`, `,.1f`, `.3e`, `.0%` or `8.2f`.
    ///
    /// Returns `None` when the text does not follow the grammar.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut rest = spec.trim();
        if rest.is_empty() {
            return None;
        }

        let style = match rest.chars().last() {
            Some('f' | 'F') => Some(FloatStyle::Fixed),
            Some('e' | 'E') => Some(FloatStyle::Exponent),
            Some('%') => Some(FloatStyle::Percent),
            _ => None,
        };
        if style.is_some() {
            rest = &rest[..rest.len() - 1];
        }

        let (head, precision) = match rest.split_once('.') {
            Some((head, digits)) => {
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                (head, Some(digits.parse::<usize>().ok()?))
            }
            None => (rest, None),
        };

        let (head, grouping) = match head.strip_suffix(',') {
            Some(head) => (head, true),
            None => (head, false),
        };

        let width = if head.is_empty() {
            None
        } else if head.bytes().all(|b| b.is_ascii_digit()) {
            Some(head.parse::<usize>().ok()?)
        } else {
            return None;
        };

        // A bare width or bare grouping flag is not a float format.
        if style.is_none() && precision.is_none() {
            return None;
        }

        Some(Self {
            width,
            grouping,
            precision,
            style: style.unwrap_or(FloatStyle::Fixed),
        })
    }

    /// Number of decimals shown for the underlying value.
    ///
    /// Percent formats shift the value by two decimal places.
    pub fn decimals(&self) -> usize {
        let precision = self.precision.unwrap_or(Self::DEFAULT_PRECISION);
        match self.style {
            FloatStyle::Percent => precision + 2,
            FloatStyle::Fixed | FloatStyle::Exponent => precision,
        }
    }

    /// Increment applied by the up/down keys of a spinner using this format.
    pub fn step(&self) -> f64 {
        10f64.powi(-(self.decimals() as i32))
    }

    /// Render `value` for display.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return pad(value.to_string(), self.width);
        }
        let precision = self.precision.unwrap_or(Self::DEFAULT_PRECISION);
        let text = match self.style {
            FloatStyle::Fixed => fixed(value, precision, self.grouping),
            FloatStyle::Percent => format!("{}%", fixed(value * 100.0, precision, self.grouping)),
            FloatStyle::Exponent => exponent(value, precision),
        };
        pad(text, self.width)
    }
}

impl fmt::Display for FloatFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(width) = self.width {
            write!(f, "{width}")?;
        }
        if self.grouping {
            f.write_str(",")?;
        }
        if let Some(precision) = self.precision {
            write!(f, ".{precision}")?;
        }
        f.write_str(match self.style {
            FloatStyle::Fixed => "f",
            FloatStyle::Exponent => "e",
            FloatStyle::Percent => "%",
        })
    }
}

fn fixed(value: f64, precision: usize, grouping: bool) -> String {
    let text = format!("{value:.precision$}");
    if !grouping {
        return text;
    }
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Exponent notation with a signed, two-digit minimum exponent (`1.50e+03`).
fn exponent(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$e}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => text,
    }
}

fn pad(text: String, width: Option<usize>) -> String {
    match width {
        Some(width) if text.chars().count() < width => format!("{text:>width$}"),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fmt(spec: &str, value: f64) -> String {
        FloatFormat::parse(spec).map(|f| f.format(value)).unwrap_or_default()
    }

    // ── Parsing ──────────────────────────────────────────────────────

    #[test]
    fn parses_common_specs() {
        assert_eq!(
            FloatFormat::parse(".2f"),
            Some(FloatFormat {
                width: None,
                grouping: false,
                precision: Some(2),
                style: FloatStyle::Fixed
            })
        );
        assert_eq!(FloatFormat::parse(",.1f").map(|f| f.grouping), Some(true));
        assert_eq!(FloatFormat::parse(".3e").map(|f| f.style), Some(FloatStyle::Exponent));
        assert_eq!(FloatFormat::parse(".0%").map(|f| f.style), Some(FloatStyle::Percent));
        assert_eq!(FloatFormat::parse("8.2f").and_then(|f| f.width), Some(8));
        assert_eq!(FloatFormat::parse(".4").map(|f| f.style), Some(FloatStyle::Fixed));
    }

    #[test]
    fn rejects_malformed_specs() {
        assert_eq!(FloatFormat::parse(""), None);
        assert_eq!(FloatFormat::parse("abc"), None);
        assert_eq!(FloatFormat::parse(".xf"), None);
        assert_eq!(FloatFormat::parse(".f"), None);
        assert_eq!(FloatFormat::parse("10"), None);
    }

    #[test]
    fn display_round_trips_spec() {
        let f = FloatFormat::parse(",.2f").unwrap();
        assert_eq!(f.to_string(), ",.2f");
    }

    // ── Rendering ────────────────────────────────────────────────────

    #[test]
    fn fixed_rounds_for_display_only() {
        assert_eq!(fmt(".2f", 3.14159), "3.14");
        assert_eq!(fmt(".2f", 99.999), "100.00");
        assert_eq!(fmt(".0f", 2.7), "3");
    }

    #[test]
    fn grouping_inserts_thousands_separators() {
        assert_eq!(fmt(",.2f", 1234567.891), "1,234,567.89");
        assert_eq!(fmt(",.0f", -1000.0), "-1,000");
        assert_eq!(fmt(",.1f", 999.0), "999.0");
    }

    #[test]
    fn percent_scales_value() {
        assert_eq!(fmt(".1%", 0.256), "25.6%");
    }

    #[test]
    fn exponent_uses_signed_two_digit_exponent() {
        assert_eq!(fmt(".2e", 1500.0), "1.50e+03");
        assert_eq!(fmt(".1e", 0.00012), "1.2e-04");
    }

    #[test]
    fn width_pads_on_the_left() {
        assert_eq!(fmt("8.2f", 3.5), "    3.50");
    }

    #[test]
    fn decimals_and_step() {
        let f = FloatFormat::parse(".3f").unwrap();
        assert_eq!(f.decimals(), 3);
        assert!((f.step() - 0.001).abs() < 1e-12);
        assert_eq!(FloatFormat::parse(".1%").unwrap().decimals(), 3);
        assert_eq!(FloatFormat::default().decimals(), 2);
    }
}
