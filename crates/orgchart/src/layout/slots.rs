//! Contact slots inside unit boxes.
//!
//! A leaf unit shows its contacts in one row below the unit name; every
//! other unit stacks them. Slots are the hit rectangles used when a contact
//! is dragged onto another contact.

use serde::Serialize;

use orgchart_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    record::LeafItem,
};

use super::LayoutEngine;

/// Direction in which the contact slots of a unit are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotOrientation {
    /// One row, left to right (leaf units).
    Horizontal,
    /// One column, top to bottom (units with children).
    Vertical,
}

/// Hit rectangle of one contact inside its unit's box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeafSlot {
    leaf: Id,
    bounds: Bounds,
    orientation: SlotOrientation,
}

impl LeafSlot {
    pub fn leaf(&self) -> Id {
        self.leaf
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn orientation(&self) -> SlotOrientation {
        self.orientation
    }

    /// `true` if `point` lies in the leading half of the slot along its
    /// orientation.
    pub fn is_leading_half(&self, point: Point) -> bool {
        let center = self.bounds.center();
        match self.orientation {
            SlotOrientation::Horizontal => point.x() < center.x(),
            SlotOrientation::Vertical => point.y() < center.y(),
        }
    }
}

impl LayoutEngine {
    /// Slots for `leaves` (already in slot order) inside a unit box.
    pub(super) fn leaf_slots(
        &self,
        unit_bounds: Bounds,
        is_leaf_unit: bool,
        leaves: &[&LeafItem],
        label_widths: &[f32],
    ) -> Vec<LeafSlot> {
        let config = &self.config;
        let top = unit_bounds.min_y() + config.box_top_padding();

        if is_leaf_unit {
            let mut x = unit_bounds.min_x() + config.leaf_row_extra() / 2.0;
            leaves
                .iter()
                .zip(label_widths)
                .map(|(leaf, &width)| {
                    let bounds = Bounds::new_from_top_left(
                        Point::new(x, top),
                        Size::new(width, config.leaf_row_height()),
                    );
                    x += width + config.leaf_gap();
                    LeafSlot {
                        leaf: leaf.id(),
                        bounds,
                        orientation: SlotOrientation::Horizontal,
                    }
                })
                .collect()
        } else {
            let x = unit_bounds.min_x() + config.leaf_inset();
            let width = (unit_bounds.width() - 2.0 * config.leaf_inset()).max(0.0);
            let step = config.leaf_row_height() + config.leaf_row_gap();
            leaves
                .iter()
                .enumerate()
                .map(|(row, leaf)| LeafSlot {
                    leaf: leaf.id(),
                    bounds: Bounds::new_from_top_left(
                        Point::new(x, top + row as f32 * step),
                        Size::new(width, config.leaf_row_height()),
                    ),
                    orientation: SlotOrientation::Vertical,
                })
                .collect()
        }
    }
}
