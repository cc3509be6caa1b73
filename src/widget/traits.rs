//! Widget trait: render into strips and react to keys.

use crate::css::styles::Styles;
use crate::event::input::KeyEvent;
use crate::geometry::Region;
use crate::render::strip::Strip;

/// What a widget did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Not handled; the form may use it for navigation.
    Ignored,
    /// Handled without changing the value (cursor movement).
    Consumed,
    /// The value changed.
    Changed,
}

impl KeyResult {
    pub fn handled(self) -> bool {
        self != KeyResult::Ignored
    }
}

/// Implemented by every terminal widget.
///
/// The trait is object-safe; `render` takes `&self` and returns owned strips.
pub trait Widget {
    /// Type name used in logs.
    fn widget_type(&self) -> &str;

    /// Render into strips covering `region`, in absolute screen coordinates.
    fn render(&self, region: Region, styles: &Styles) -> Vec<Strip>;

    fn can_focus(&self) -> bool {
        false
    }

    /// Rows the widget wants at the given width.
    fn desired_height(&self, width: i32) -> i32 {
        let _ = width;
        1
    }

    fn set_focus(&mut self, focused: bool) {
        let _ = focused;
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyResult {
        let _ = key;
        KeyResult::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::Key;
    use crate::render::strip::CellStyle;

    struct Dot;

    impl Widget for Dot {
        fn widget_type(&self) -> &str {
            "Dot"
        }

        fn render(&self, region: Region, _styles: &Styles) -> Vec<Strip> {
            vec![Strip::text(region.y, region.x, region.width, ".", CellStyle::default())]
        }
    }

    #[test]
    fn defaults_are_passive() {
        let mut dot = Dot;
        assert!(!dot.can_focus());
        assert_eq!(dot.desired_height(10), 1);
        assert_eq!(dot.handle_key(&KeyEvent::plain(Key::Enter)), KeyResult::Ignored);
        assert!(!KeyResult::Ignored.handled());
        assert!(KeyResult::Consumed.handled());
    }

    #[test]
    fn object_safe() {
        let widgets: Vec<Box<dyn Widget>> = vec![Box::new(Dot)];
        let strips = widgets[0].render(Region::new(1, 2, 3, 1), &Styles::new());
        assert_eq!(strips[0].x_offset, 1);
        assert_eq!(strips[0].y, 2);
        assert_eq!(strips[0].width(), 3);
    }
}
