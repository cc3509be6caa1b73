//! The mounted form: sections, focus chain, button bar and frame rendering.
//!
//! [`FormScreen`] is created from a [`FormShell`] when the terminal backend
//! is mounted. It does not own the field widgets; every operation that needs
//! them borrows the backend's widget map.

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::backend::terminal::FieldWidget;
use crate::backend::{ButtonRole, FormShell, Section, WidgetHandle};
use crate::css::styles::Styles;
use crate::geometry::{Offset, Region};
use crate::layout::{ItemRegions, LayoutEngine, LayoutItem};
use crate::render::compositor::Compositor;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::{ScrollState, Widget};
use crate::widgets::{Button, Footer, Header, TabBar};

pub type FieldWidgets = SlotMap<WidgetHandle, FieldWidget>;

// ---------------------------------------------------------------------------
// FocusChain
// ---------------------------------------------------------------------------

/// Ordered focus targets with a cursor for Tab / Shift+Tab navigation.
#[derive(Debug, Clone)]
pub struct FocusChain<T> {
    items: Vec<T>,
    current: Option<usize>,
}

impl<T: Copy + PartialEq> FocusChain<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            current: None,
        }
    }

    /// Replace the chain, keeping the current target when it survives.
    pub fn rebuild(&mut self, items: Vec<T>) {
        let previous = self.current();
        self.items = items;
        self.current = previous.and_then(|p| self.items.iter().position(|&i| i == p));
    }

    pub fn current(&self) -> Option<T> {
        self.current.and_then(|i| self.items.get(i).copied())
    }

    /// Advance and wrap. Starts at the first item when nothing is focused.
    pub fn focus_next(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let next = self.current.map_or(0, |i| (i + 1) % self.items.len());
        self.current = Some(next);
        self.current()
    }

    /// Step back and wrap. Starts at the last item when nothing is focused.
    pub fn focus_previous(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let len = self.items.len();
        let prev = self.current.map_or(len - 1, |i| (i + len - 1) % len);
        self.current = Some(prev);
        self.current()
    }

    pub fn focus(&mut self, item: T) -> bool {
        match self.items.iter().position(|&i| i == item) {
            Some(pos) => {
                self.current = Some(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Copy + PartialEq> Default for FocusChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Something that can hold keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focusable {
    Field(WidgetHandle),
    /// Index into the button bar.
    Button(usize),
}

// ---------------------------------------------------------------------------
// FormScreen
// ---------------------------------------------------------------------------

struct BarButton {
    role: ButtonRole,
    tooltip: Option<String>,
    widget: Button,
}

pub struct FormScreen {
    header: Header,
    tab_bar: Option<TabBar>,
    footer: Footer,
    sections: Vec<Section>,
    buttons: Vec<BarButton>,
    focus: FocusChain<Focusable>,
    scroll: ScrollState,
    follow_focus: bool,
    layout: LayoutEngine,
    compositor: Compositor,
    /// Message and whether it is an error. Cleared on focus change.
    message: Option<(String, bool)>,
}

impl FormScreen {
    pub fn new(shell: &FormShell, widgets: &mut FieldWidgets) -> Self {
        let tabbed = shell.sections.len() > 1 || shell.sections.iter().any(|s| s.title.is_some());
        let mut tab_bar = tabbed.then(|| {
            shell.sections.iter().fold(TabBar::new(), |bar, s| {
                bar.with_tab(s.title.clone().unwrap_or_default(), s.enabled)
            })
        });
        if let Some(bar) = tab_bar.as_mut() {
            if let Some(first) = shell.sections.iter().position(|s| s.enabled) {
                bar.select(first);
            }
        }

        let buttons: Vec<BarButton> = shell
            .buttons
            .iter()
            .map(|slot| {
                let mut widget = Button::new(slot.label.clone()).with_enabled(slot.enabled);
                if let Some(style) = &slot.style {
                    widget = widget.with_style(style);
                }
                BarButton {
                    role: slot.role.clone(),
                    tooltip: slot.tooltip.clone(),
                    widget,
                }
            })
            .collect();

        let mut footer = Footer::new();
        if shell.buttons.iter().any(|b| b.role == ButtonRole::Submit) {
            footer = footer.with_hint("^S", "Submit");
        }
        let has_cancel = shell.buttons.iter().any(|b| b.role == ButtonRole::Cancel);
        footer = footer
            .with_hint("Esc", if has_cancel { "Cancel" } else { "Quit" })
            .with_hint("Tab", "Next");
        if tabbed {
            footer = footer.with_hint("^\u{2190}/^\u{2192}", "Tabs");
        }

        let mut screen = Self {
            header: Header::new(shell.window.title.clone()),
            tab_bar,
            footer,
            sections: shell.sections.clone(),
            buttons,
            focus: FocusChain::new(),
            scroll: ScrollState::default(),
            follow_focus: false,
            layout: LayoutEngine::new(),
            compositor: Compositor::new(0, 0),
            message: None,
        };
        screen.refresh_focus(widgets);
        screen
    }

    // -- Sections ------------------------------------------------------------

    pub fn active_section(&self) -> usize {
        self.tab_bar.as_ref().map_or(0, TabBar::active)
    }

    /// Switch to section `index` if it is enabled. Focus moves to its first
    /// target.
    pub fn select_section(&mut self, index: usize, widgets: &mut FieldWidgets) -> bool {
        let switched = match self.tab_bar.as_mut() {
            Some(bar) if bar.active() != index => bar.select(index),
            _ => false,
        };
        if switched {
            self.enter_section(widgets);
        }
        switched
    }

    /// Move to the next or previous enabled section.
    pub fn cycle_section(&mut self, forward: bool, widgets: &mut FieldWidgets) -> bool {
        let switched = self.tab_bar.as_mut().is_some_and(|bar| bar.cycle(forward));
        if switched {
            self.enter_section(widgets);
        }
        switched
    }

    fn enter_section(&mut self, widgets: &mut FieldWidgets) {
        debug!(section = self.active_section(), "section selected");
        self.scroll.scroll_to(0);
        self.set_focus(None, widgets);
        self.refresh_focus(widgets);
    }

    fn section_of(&self, handle: WidgetHandle) -> Option<usize> {
        self.sections.iter().position(|s| s.widgets.contains(&handle))
    }

    // -- Focus ---------------------------------------------------------------

    pub fn focused(&self) -> Option<Focusable> {
        self.focus.current()
    }

    /// Recompute focus targets after sections, visibility or enabled flags
    /// change. Focus stays put when its target is still reachable.
    pub fn refresh_focus(&mut self, widgets: &mut FieldWidgets) {
        let mut items = Vec::new();
        if let Some(section) = self.sections.get(self.active_section()) {
            if section.enabled {
                items.extend(
                    section
                        .widgets
                        .iter()
                        .copied()
                        .filter(|&h| widgets.get(h).is_some_and(FieldWidget::is_interactive))
                        .map(Focusable::Field),
                );
            }
        }
        items.extend(
            self.buttons
                .iter()
                .enumerate()
                .filter(|(_, b)| b.widget.is_enabled())
                .map(|(i, _)| Focusable::Button(i)),
        );

        let before = self.focus.current();
        self.focus.rebuild(items);
        if self.focus.current().is_none() {
            self.focus.focus_next();
        }
        if self.focus.current() != before {
            self.apply_focus(before, widgets);
        }
    }

    pub fn focus_next(&mut self, widgets: &mut FieldWidgets) {
        let before = self.focus.current();
        self.focus.focus_next();
        self.apply_focus(before, widgets);
    }

    pub fn focus_previous(&mut self, widgets: &mut FieldWidgets) {
        let before = self.focus.current();
        self.focus.focus_previous();
        self.apply_focus(before, widgets);
    }

    /// Focus a field, switching to its section first. Returns false when the
    /// field cannot take focus.
    pub fn focus_field(&mut self, handle: WidgetHandle, widgets: &mut FieldWidgets) -> bool {
        if let Some(section) = self.section_of(handle) {
            if section != self.active_section() {
                self.select_section(section, widgets);
            }
        }
        self.set_focus(Some(Focusable::Field(handle)), widgets)
    }

    fn set_focus(&mut self, target: Option<Focusable>, widgets: &mut FieldWidgets) -> bool {
        let before = self.focus.current();
        let found = match target {
            Some(t) => self.focus.focus(t),
            None => {
                self.focus.clear();
                true
            }
        };
        if found {
            self.apply_focus(before, widgets);
        }
        found
    }

    fn apply_focus(&mut self, before: Option<Focusable>, widgets: &mut FieldWidgets) {
        let after = self.focus.current();
        if before == after {
            return;
        }
        self.set_target_focus(before, false, widgets);
        self.set_target_focus(after, true, widgets);
        self.follow_focus = true;
        self.message = None;
    }

    fn set_target_focus(&mut self, target: Option<Focusable>, on: bool, widgets: &mut FieldWidgets) {
        match target {
            Some(Focusable::Field(h)) => {
                if let Some(w) = widgets.get_mut(h) {
                    w.set_focus(on);
                }
            }
            Some(Focusable::Button(i)) => {
                if let Some(b) = self.buttons.get_mut(i) {
                    b.widget.set_focus(on);
                }
            }
            None => {}
        }
    }

    // -- Buttons -------------------------------------------------------------

    /// Role of the button at `index`, if it exists and is enabled.
    pub fn button_role(&self, index: usize) -> Option<&ButtonRole> {
        self.buttons
            .get(index)
            .filter(|b| b.widget.is_enabled())
            .map(|b| &b.role)
    }

    /// Whether the button bar holds an enabled button with `role`.
    pub fn has_button(&self, role: &ButtonRole) -> bool {
        self.buttons
            .iter()
            .any(|b| &b.role == role && b.widget.is_enabled())
    }

    // -- Status --------------------------------------------------------------

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), false));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), true));
    }

    pub fn scroll_by(&mut self, rows: i32) {
        self.scroll.scroll_by(rows);
    }

    // -- Rendering -----------------------------------------------------------

    /// Draw the whole form into a `width` x `height` buffer.
    pub fn render(&mut self, widgets: &FieldWidgets, width: u16, height: u16) -> &Compositor {
        if (self.compositor.width, self.compositor.height) == (width, height) {
            self.compositor.clear();
        } else {
            self.compositor.resize(width, height);
        }
        let styles = Styles::new();

        let (header_row, rest) = self.compositor.bounds().split_top(1);
        let strips = self.header.render(header_row, &styles);
        self.compositor.place_strips(&strips, header_row);

        let rest = match &self.tab_bar {
            Some(bar) => {
                let (row, rest) = rest.split_top(1);
                let strips = bar.render(row, &styles);
                self.compositor.place_strips(&strips, row);
                rest
            }
            None => rest,
        };

        let (body, footer_row) = rest.split_top(rest.height - 1);
        let (body, button_row) = if self.buttons.is_empty() {
            (body, Region::default())
        } else {
            body.split_top(body.height - 1)
        };

        self.render_body(widgets, body);
        self.render_buttons(button_row);
        self.render_footer(widgets, footer_row);
        &self.compositor
    }

    fn render_body(&mut self, widgets: &FieldWidgets, body: Region) {
        let active = self.active_section();
        let Some(section) = self.sections.get(active) else {
            return;
        };
        let inner = Region::new(body.x + 1, body.y, (body.width - 2).max(0), body.height);
        let shown: Vec<(WidgetHandle, &FieldWidget)> = section
            .widgets
            .iter()
            .filter_map(|&h| widgets.get(h).filter(|w| w.state().visible).map(|w| (h, w)))
            .collect();
        let items: Vec<LayoutItem> = shown.iter().map(|(_, w)| w.layout_item(inner.width)).collect();

        let arrangement = match self.layout.arrange(section.layout, &items, inner.width) {
            Ok(arrangement) => arrangement,
            Err(err) => {
                warn!(%err, "form layout failed");
                return;
            }
        };
        self.scroll.set_sizes(arrangement.height, inner.height);

        if std::mem::take(&mut self.follow_focus) {
            if let Some(Focusable::Field(focused)) = self.focus.current() {
                if let Some(pos) = shown.iter().position(|(h, _)| *h == focused) {
                    let ItemRegions { label, control } = arrangement.items[pos];
                    let top = label.y.min(control.y);
                    self.scroll
                        .scroll_into_view(top, label.bottom().max(control.bottom()) - top);
                }
            }
        }

        let offset = Offset::new(inner.x, inner.y - self.scroll.offset);
        let dimmed = !section.enabled;
        for ((_, widget), regions) in shown.iter().zip(&arrangement.items) {
            let strips = widget.render(
                regions.label.translate(offset),
                regions.control.translate(offset),
                dimmed,
            );
            self.compositor.place_strips(&strips, inner);
        }

        if self.scroll.is_scrollable() && body.width > 0 {
            let dim = CellStyle::new().dim();
            let x = body.right() - 1;
            let mut marks = Vec::new();
            if self.scroll.offset > 0 {
                marks.push(Strip::text(body.y, x, 1, "\u{25b2}", dim.clone()));
            }
            if self.scroll.offset < self.scroll.max_scroll() {
                marks.push(Strip::text(body.bottom() - 1, x, 1, "\u{25bc}", dim));
            }
            self.compositor.place_strips(&marks, body);
        }
    }

    fn render_buttons(&mut self, row: Region) {
        if row.is_empty() {
            return;
        }
        let total: i32 = self.buttons.iter().map(|b| b.widget.width() + 1).sum::<i32>() - 1;
        let mut x = (row.right() - 1 - total).max(row.x);
        let styles = Styles::new();
        for button in &self.buttons {
            let width = button.widget.width();
            let strips = button.widget.render(Region::new(x, row.y, width, 1), &styles);
            self.compositor.place_strips(&strips, row);
            x += width + 1;
        }
    }

    fn render_footer(&mut self, widgets: &FieldWidgets, row: Region) {
        match &self.message {
            Some((text, true)) => self.footer.set_error(text.clone()),
            Some((text, false)) => self.footer.set_status(Some(text.clone())),
            None => {
                let tooltip = self.focused_tooltip(widgets).map(str::to_owned);
                self.footer.set_status(tooltip);
            }
        }
        let strips = self.footer.render(row, &Styles::new());
        self.compositor.place_strips(&strips, row);
    }

    fn focused_tooltip<'a>(&'a self, widgets: &'a FieldWidgets) -> Option<&'a str> {
        let own = match self.focus.current()? {
            Focusable::Field(h) => widgets.get(h).and_then(FieldWidget::tooltip),
            Focusable::Button(i) => self.buttons.get(i).and_then(|b| b.tooltip.as_deref()),
        };
        own.or_else(|| {
            self.sections
                .get(self.active_section())
                .and_then(|s| s.tooltip.as_deref())
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── FocusChain ───────────────────────────────────────────────────

    #[test]
    fn empty_chain_has_no_focus() {
        let mut chain: FocusChain<u8> = FocusChain::default();
        assert!(chain.is_empty());
        assert_eq!(chain.focus_next(), None);
        assert_eq!(chain.focus_previous(), None);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut chain = FocusChain::new();
        chain.rebuild(vec![1, 2, 3]);
        assert_eq!(chain.focus_next(), Some(1));
        assert_eq!(chain.focus_next(), Some(2));
        assert_eq!(chain.focus_next(), Some(3));
        assert_eq!(chain.focus_next(), Some(1));
        assert_eq!(chain.focus_previous(), Some(3));
    }

    #[test]
    fn previous_from_nothing_starts_at_end() {
        let mut chain = FocusChain::new();
        chain.rebuild(vec![1, 2, 3]);
        assert_eq!(chain.focus_previous(), Some(3));
    }

    #[test]
    fn rebuild_keeps_surviving_focus() {
        let mut chain = FocusChain::new();
        chain.rebuild(vec![1, 2, 3]);
        chain.focus(2);
        chain.rebuild(vec![2, 3]);
        assert_eq!(chain.current(), Some(2));
        chain.rebuild(vec![3]);
        assert_eq!(chain.current(), None);
        assert!(!chain.focus(9));
        assert_eq!(chain.len(), 1);
    }
}
