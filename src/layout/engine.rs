//! Taffy-backed arrangement of labelled field rows.
//!
//! [`LayoutEngine`] turns a list of [`LayoutItem`]s and a [`LayoutKind`] into
//! a label region and a control region per item. The tree is rebuilt on every
//! call; forms are small and only re-laid out on resize or visibility changes.

use std::fmt;

use taffy::prelude::*;

use crate::config::LayoutKind;
use crate::geometry::Region;

/// Columns between side-by-side items.
const COLUMN_GAP: f32 = 2.0;

/// What the engine needs to know about one field row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutItem {
    /// Columns needed by the caption.
    pub label_width: i32,
    /// Rows needed by the control.
    pub control_height: i32,
    /// Fixed control width in columns, or stretch when `None`.
    pub control_width: Option<i32>,
}

impl LayoutItem {
    pub fn new(label_width: i32, control_height: i32) -> Self {
        Self {
            label_width,
            control_height: control_height.max(1),
            control_width: None,
        }
    }

    pub fn with_control_width(mut self, width: Option<i32>) -> Self {
        self.control_width = width.map(|w| w.max(1));
        self
    }
}

/// Where one item's caption and control go, relative to the arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRegions {
    pub label: Region,
    pub control: Region,
}

/// Result of [`LayoutEngine::arrange`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Arrangement {
    pub items: Vec<ItemRegions>,
    /// Total rows used; may exceed the viewport.
    pub height: i32,
}

/// Taffy rejected the tree.
#[derive(Debug)]
pub struct LayoutError(taffy::TaffyError);

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout failed: {:?}", self.0)
    }
}

impl std::error::Error for LayoutError {}

impl From<taffy::TaffyError> for LayoutError {
    fn from(err: taffy::TaffyError) -> Self {
        LayoutError(err)
    }
}

struct ItemNodes {
    container: NodeId,
    label: NodeId,
    control: NodeId,
}

pub struct LayoutEngine {
    tree: TaffyTree<()>,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
        }
    }

    /// Arrange `items` within `width` columns, starting at the origin.
    pub fn arrange(
        &mut self,
        kind: LayoutKind,
        items: &[LayoutItem],
        width: i32,
    ) -> Result<Arrangement, LayoutError> {
        self.tree.clear();
        if items.is_empty() || width <= 0 {
            return Ok(Arrangement::default());
        }

        // Shared caption column for side-by-side layouts.
        let label_column = items.iter().map(|i| i.label_width).max().unwrap_or(0) + 1;

        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            nodes.push(self.item_nodes(kind, item, label_column as f32)?);
        }
        let containers: Vec<NodeId> = nodes.iter().map(|n| n.container).collect();
        let root = self
            .tree
            .new_with_children(root_style(kind, width as f32), &containers)?;

        self.tree.compute_layout(
            root,
            taffy::geometry::Size {
                width: AvailableSpace::Definite(width as f32),
                height: AvailableSpace::MaxContent,
            },
        )?;

        let mut arranged = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let origin = self.tree.layout(node.container)?.location;
            arranged.push(ItemRegions {
                label: self.region(node.label, origin)?,
                control: self.region(node.control, origin)?,
            });
        }
        let height = self.tree.layout(root)?.size.height.round() as i32;
        Ok(Arrangement {
            items: arranged,
            height,
        })
    }

    fn item_nodes(
        &mut self,
        kind: LayoutKind,
        item: &LayoutItem,
        label_column: f32,
    ) -> Result<ItemNodes, LayoutError> {
        let side_by_side = matches!(kind, LayoutKind::Form | LayoutKind::Grid);

        let mut label = Style::default();
        label.size.height = Dimension::from_length(1.0);
        if side_by_side {
            label.size.width = Dimension::from_length(label_column);
            label.flex_shrink = 0.0;
        }

        let mut control = Style::default();
        control.size.height = Dimension::from_length(item.control_height as f32);
        control.min_size.width = Dimension::from_length(0.0);
        match item.control_width {
            Some(w) => {
                control.size.width = Dimension::from_length(w as f32);
                control.max_size.width = Dimension::from_percent(1.0);
            }
            None if side_by_side => control.flex_grow = 1.0,
            None => {}
        }

        let mut container = Style::default();
        container.flex_direction = if side_by_side {
            FlexDirection::Row
        } else {
            FlexDirection::Column
        };
        container.min_size.width = Dimension::from_length(0.0);
        match kind {
            LayoutKind::Horizontal => {
                container.flex_grow = 1.0;
                container.flex_basis = Dimension::from_length(0.0);
            }
            LayoutKind::Grid => {
                container.size.width = Dimension::from_percent(0.5);
                container.padding.right = LengthPercentage::from_length(1.0);
            }
            LayoutKind::Vertical | LayoutKind::Form => {}
        }

        let label = self.tree.new_leaf(label)?;
        let control = self.tree.new_leaf(control)?;
        let container = self.tree.new_with_children(container, &[label, control])?;
        Ok(ItemNodes {
            container,
            label,
            control,
        })
    }

    fn region(
        &self,
        node: NodeId,
        origin: taffy::geometry::Point<f32>,
    ) -> Result<Region, LayoutError> {
        let layout = self.tree.layout(node)?;
        Ok(Region::new(
            (origin.x + layout.location.x).round() as i32,
            (origin.y + layout.location.y).round() as i32,
            layout.size.width.round() as i32,
            layout.size.height.round() as i32,
        ))
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn root_style(kind: LayoutKind, width: f32) -> Style {
    let mut style = Style::default();
    style.size.width = Dimension::from_length(width);
    match kind {
        LayoutKind::Vertical => {
            style.flex_direction = FlexDirection::Column;
            style.gap.height = LengthPercentage::from_length(1.0);
        }
        LayoutKind::Form => {
            style.flex_direction = FlexDirection::Column;
        }
        LayoutKind::Horizontal => {
            style.flex_direction = FlexDirection::Row;
            style.gap.width = LengthPercentage::from_length(COLUMN_GAP);
            style.align_items = Some(AlignItems::FlexStart);
        }
        LayoutKind::Grid => {
            style.flex_direction = FlexDirection::Row;
            style.flex_wrap = FlexWrap::Wrap;
            style.align_items = Some(AlignItems::FlexStart);
        }
    }
    style
}
