//! Plain-text capture of rendered output.

use crate::css::styles::Styles;
use crate::geometry::Region;
use crate::render::compositor::Compositor;
use crate::render::strip::Strip;
use crate::widget::Widget;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render `widget` into a `width` x `height` region at the origin.
///
/// Rows are right-trimmed and joined with `'\n'`.
pub fn render_to_string(widget: &dyn Widget, width: i32, height: i32) -> String {
    render_to_styled_string(widget, width, height, &Styles::new())
}

/// [`render_to_string`] with inherited styles.
pub fn render_to_styled_string(
    widget: &dyn Widget,
    width: i32,
    height: i32,
    styles: &Styles,
) -> String {
    let strips = widget.render(Region::new(0, 0, width, height), styles);
    strips_to_string(&strips, width, height)
}

/// Overlay `strips` on a blank grid. Cells outside the grid are dropped.
pub fn strips_to_string(strips: &[Strip], width: i32, height: i32) -> String {
    if width <= 0 || height <= 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; width as usize]; height as usize];
    for strip in strips.iter().filter(|s| (0..height).contains(&s.y)) {
        let row = &mut grid[strip.y as usize];
        for (i, cell) in strip.cells.iter().enumerate() {
            let x = strip.x_offset + i as i32;
            if (0..width).contains(&x) {
                row[x as usize] = cell.ch;
            }
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every row of a composed frame, right-trimmed.
pub fn compositor_to_string(compositor: &Compositor) -> String {
    if compositor.width == 0 || compositor.height == 0 {
        return String::new();
    }
    (0..compositor.height)
        .map(|y| compositor.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================
