//! Hit-testing pointer positions against a layout.
//!
//! All points are chart coordinates; convert screen points through
//! [`Viewport::screen_to_diagram`](crate::viewport::Viewport::screen_to_diagram)
//! first.

use orgchart_core::{
    geometry::{Bounds, Insets, Point},
    identifier::Id,
};

use crate::layout::{LeafSlot, PositionedNode, SlotOrientation};

/// Returns the first unit, in pre-order, whose box inflated by `margin`
/// contains `point`.
///
/// The box grows by `margin` to the right, above and below, but not to the
/// left. Boxes of one layout never overlap, so traversal order only matters
/// for degenerate input.
pub fn find_unit_at(root: &PositionedNode, point: Point, margin: f32) -> Option<Id> {
    let inflate = Insets::new(margin, margin, margin, 0.0);
    root.walk()
        .find(|node| node.bounds().add_padding(inflate).contains(point))
        .map(PositionedNode::id)
}

/// Looks up the positioned node of unit `id`.
pub fn find_node(root: &PositionedNode, id: Id) -> Option<&PositionedNode> {
    root.walk().find(|node| node.id() == id)
}

/// Returns the detached unit whose box contains `point`.
pub fn find_detached_at(detached: &[PositionedNode], point: Point) -> Option<Id> {
    detached
        .iter()
        .find(|node| node.bounds().contains(point))
        .map(PositionedNode::id)
}

/// A contact slot under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafHit {
    slot: LeafSlot,
    unit: Id,
}

impl LeafHit {
    pub fn leaf(&self) -> Id {
        self.slot.leaf()
    }

    /// Unit whose box holds the slot.
    pub fn unit(&self) -> Id {
        self.unit
    }

    pub fn slot(&self) -> &LeafSlot {
        &self.slot
    }

    pub fn orientation(&self) -> SlotOrientation {
        self.slot.orientation()
    }

    pub fn bounds(&self) -> Bounds {
        self.slot.bounds()
    }
}

/// Returns the contact slot containing `point`, searching the units of
/// `root` in pre-order.
pub fn find_leaf_at(root: &PositionedNode, point: Point) -> Option<LeafHit> {
    root.walk().find_map(|node| {
        node.leaf_slots()
            .iter()
            .find(|slot| slot.bounds().contains(point))
            .map(|slot| LeafHit {
                slot: *slot,
                unit: node.id(),
            })
    })
}

#[cfg(test)]
mod tests {
    use orgchart_core::{
        color::{Color, LevelPalette},
        record::{LeafItem, OrgUnit, Placement},
    };

    use super::*;
    use crate::{
        config::{LayoutConfig, TextMeasureKind},
        layout::{ChartLayout, LayoutEngine},
        records::ChartRecords,
    };

    fn unit(id: &str, placement: Placement) -> OrgUnit {
        OrgUnit::new(Id::new(id), Id::new("acme"), id, placement)
    }

    /// A(0,0) with children B(160,0) and C(160,70); C holds one contact.
    fn sample_layout() -> ChartLayout {
        let config = LayoutConfig::default().with_text_measure(TextMeasureKind::Estimate);
        let engine = LayoutEngine::new(config, LevelPalette::default(), Color::default());
        engine.layout(&ChartRecords::new(
            vec![
                unit("A", Placement::root(10.0)),
                unit("B", Placement::child_of(Id::new("A"), 10.0)),
                unit("C", Placement::child_of(Id::new("A"), 20.0)),
                unit("N", Placement::Unplaced),
            ],
            vec![LeafItem::new(Id::new("L"), Id::new("C"), "Ito", "Ken", 1)],
        ))
    }

    #[test]
    fn test_find_unit_inside_box() {
        let layout = sample_layout();
        let root = layout.root().unwrap();

        assert_eq!(find_unit_at(root, Point::new(75.0, 30.0), 0.0), Some(Id::new("A")));
        assert_eq!(find_unit_at(root, Point::new(200.0, 90.0), 0.0), Some(Id::new("C")));
    }

    #[test]
    fn test_find_unit_margin_is_asymmetric() {
        let layout = sample_layout();
        let root = layout.root().unwrap();

        // Right of B, within the margin.
        assert_eq!(find_unit_at(root, Point::new(350.0, 30.0), 50.0), Some(Id::new("B")));
        // Far below everything.
        assert_eq!(find_unit_at(root, Point::new(200.0, 500.0), 50.0), None);
        // No margin to the left of A.
        assert_eq!(find_unit_at(root, Point::new(-1.0, 30.0), 50.0), None);
        // Inflated boxes overlap in the gaps; the parent is tested first.
        assert_eq!(find_unit_at(root, Point::new(200.0, 65.0), 50.0), Some(Id::new("A")));
        assert_eq!(find_unit_at(root, Point::new(250.0, 65.0), 50.0), Some(Id::new("B")));
    }

    #[test]
    fn test_find_node() {
        let layout = sample_layout();
        let root = layout.root().unwrap();

        let c = find_node(root, Id::new("C")).unwrap();
        assert_eq!(c.bounds().min_y(), 70.0);
        assert!(find_node(root, Id::new("N")).is_none());
        assert!(find_node(root, Id::new("missing")).is_none());
    }

    #[test]
    fn test_find_detached() {
        let layout = sample_layout();
        assert_eq!(
            find_detached_at(layout.detached(), Point::new(60.0, 225.0)),
            Some(Id::new("N"))
        );
        assert_eq!(find_detached_at(layout.detached(), Point::new(130.0, 225.0)), None);
    }

    #[test]
    fn test_find_leaf() {
        let layout = sample_layout();
        let root = layout.root().unwrap();

        let hit = find_leaf_at(root, Point::new(190.0, 120.0)).unwrap();
        assert_eq!(hit.leaf(), Id::new("L"));
        assert_eq!(hit.unit(), Id::new("C"));
        assert_eq!(hit.orientation(), SlotOrientation::Horizontal);

        // Unit name area above the slot row.
        assert!(find_leaf_at(root, Point::new(190.0, 80.0)).is_none());
    }
}
