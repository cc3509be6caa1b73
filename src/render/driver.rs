//! Crossterm terminal output.
//!
//! The `Driver` wraps a buffered stdout writer. It enters and leaves the
//! alternate screen, sets the window title and flushes compositor updates.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};

use super::compositor::CellUpdate;
use super::strip::CellStyle;

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

pub struct Driver {
    writer: BufWriter<Stdout>,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            writer: BufWriter::new(io::stdout()),
        }
    }

    /// Enter the alternate screen, enable raw mode and hide the cursor.
    pub fn enter(&mut self) -> io::Result<()> {
        execute!(self.writer, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()
    }

    /// Undo [`Driver::enter`].
    pub fn leave(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.writer, cursor::Show, LeaveAlternateScreen)
    }

    pub fn set_title(&mut self, title: &str) -> io::Result<()> {
        execute!(self.writer, SetTitle(title))
    }

    /// Queue cell updates. Call [`Driver::flush`] to send them.
    pub fn apply_updates(&mut self, updates: &[CellUpdate]) -> io::Result<()> {
        for update in updates {
            queue!(self.writer, cursor::MoveTo(update.x, update.y))?;
            self.queue_style(&update.cell.style)?;
            queue!(
                self.writer,
                Print(update.cell.ch),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Terminal size as (columns, rows).
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn queue_style(&mut self, style: &CellStyle) -> io::Result<()> {
        if let Some(color) = style.fg.as_deref().and_then(parse_color) {
            queue!(self.writer, SetForegroundColor(color))?;
        }
        if let Some(color) = style.bg.as_deref().and_then(parse_color) {
            queue!(self.writer, SetBackgroundColor(color))?;
        }
        let attributes = [
            (style.bold, Attribute::Bold),
            (style.dim, Attribute::Dim),
            (style.italic, Attribute::Italic),
            (style.underline, Attribute::Underlined),
            (style.strikethrough, Attribute::CrossedOut),
            (style.reverse, Attribute::Reverse),
        ];
        for (on, attribute) in attributes {
            if on {
                queue!(self.writer, SetAttribute(attribute))?;
            }
        }
        Ok(())
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Color parsing
// ---------------------------------------------------------------------------

/// Parse `#rgb`, `#rrggbb` or a color name into a crossterm [`Color`].
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let color = match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "fuchsia" => Color::Magenta,
        "cyan" | "aqua" => Color::Cyan,
        "white" => Color::White,
        "grey" | "gray" | "silver" => Color::Grey,
        "dark_red" | "darkred" | "maroon" => Color::DarkRed,
        "dark_green" | "darkgreen" => Color::DarkGreen,
        "dark_yellow" | "darkyellow" | "olive" => Color::DarkYellow,
        "dark_blue" | "darkblue" | "navy" => Color::DarkBlue,
        "dark_magenta" | "darkmagenta" | "purple" => Color::DarkMagenta,
        "dark_cyan" | "darkcyan" | "teal" => Color::DarkCyan,
        "dark_grey" | "dark_gray" | "darkgrey" | "darkgray" => Color::DarkGrey,
        "orange" => Color::Rgb {
            r: 0xff,
            g: 0xa5,
            b: 0x00,
        },
        _ => return None,
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 | 8 => Some(Color::Rgb {
            r: channel(hex.get(0..2)?)?,
            g: channel(hex.get(2..4)?)?,
            b: channel(hex.get(4..6)?)?,
        }),
        3 | 4 => {
            let expand = |s: &str| channel(s).map(|v| v * 17);
            Some(Color::Rgb {
                r: expand(hex.get(0..1)?)?,
                g: expand(hex.get(1..2)?)?,
                b: expand(hex.get(2..3)?)?,
            })
        }
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
