//! Recursive tree placement.
//!
//! Children sit `horizontal_gap` to the right of their parent's left edge.
//! The first child starts level with its parent; every later child starts
//! `vertical_gap` below the previous child's subtree. A subtree's vertical
//! span is the union of its own box and its children's spans.

use log::trace;

use orgchart_core::{
    geometry::{Bounds, Point, Size},
    record::LeafItem,
};

use super::{LayoutEngine, PositionedNode};
use crate::tree::TreeNode;

impl LayoutEngine {
    pub(super) fn place_subtree(&self, node: &TreeNode, origin: Point) -> PositionedNode {
        let leaves = sorted_leaves(node.leaves());
        let label_widths = self.label_widths(&leaves);
        let is_leaf_unit = node.is_leaf_unit();

        let size = self.unit_size(is_leaf_unit, &label_widths);
        let bounds = Bounds::new_from_top_left(origin, size);

        let child_x = origin.x() + self.config.horizontal_gap();
        let mut next_y = origin.y();
        let mut subtree_max_y = bounds.max_y();
        let mut children = Vec::with_capacity(node.children().len());
        for child in node.children() {
            let placed = self.place_subtree(child, Point::new(child_x, next_y));
            next_y = placed.subtree_max_y() + self.config.vertical_gap();
            subtree_max_y = subtree_max_y.max(placed.subtree_max_y());
            children.push(placed);
        }

        let leaf_slots = self.leaf_slots(bounds, is_leaf_unit, &leaves, &label_widths);
        let fill_color = self
            .palette
            .for_average(node.leaves().iter().map(LeafItem::level));

        trace!(
            unit:% = node.id(),
            x = bounds.min_x(),
            y = bounds.min_y(),
            width = bounds.width(),
            height = bounds.height(),
            subtree_max_y;
            "Placed unit"
        );

        PositionedNode {
            unit: node.unit().clone(),
            leaves: node.leaves().to_vec(),
            bounds,
            subtree_min_y: origin.y(),
            subtree_max_y,
            fill_color,
            leaf_slots,
            children,
        }
    }

    /// Box size of a unit given the measured widths of its contact labels.
    ///
    /// Leaf units lay their contacts out in one row and grow wide enough for
    /// it. Other units have a fixed width and stack their contacts.
    pub(super) fn unit_size(&self, is_leaf_unit: bool, label_widths: &[f32]) -> Size {
        let config = &self.config;
        let min_height = config.box_top_padding() + config.leaf_row_height();
        let count = label_widths.len();

        if is_leaf_unit {
            let width = if count == 0 {
                config.unit_width()
            } else {
                let labels: f32 = label_widths.iter().sum();
                let gaps = (count - 1) as f32 * config.leaf_gap();
                config.unit_width().max(labels + gaps + config.leaf_row_extra())
            };
            Size::new(width, min_height)
        } else {
            let height = if count == 0 {
                min_height
            } else {
                let rows = count as f32 * config.leaf_row_height();
                let gaps = (count - 1) as f32 * config.leaf_row_gap();
                min_height.max(config.box_top_padding() + rows + gaps)
            };
            Size::new(config.unit_width(), height)
        }
    }
}

/// Leaves in slot order: stable by sibling order, ties keep record order.
fn sorted_leaves(leaves: &[LeafItem]) -> Vec<&LeafItem> {
    let mut sorted: Vec<&LeafItem> = leaves.iter().collect();
    sorted.sort_by(|a, b| a.sibling_order().total_cmp(&b.sibling_order()));
    sorted
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use orgchart_core::{
        color::{Color, LevelPalette},
        identifier::Id,
        record::{OrgUnit, Placement},
    };

    use super::*;
    use crate::{
        config::{LayoutConfig, TextMeasureKind},
        tree::build_tree,
    };

    fn engine() -> LayoutEngine {
        let config = LayoutConfig::default().with_text_measure(TextMeasureKind::Estimate);
        LayoutEngine::new(config, LevelPalette::default(), Color::default())
    }

    /// Single-rooted acyclic trees with a few contacts per unit.
    fn tree_strategy() -> impl Strategy<Value = (Vec<OrgUnit>, Vec<LeafItem>)> {
        prop::collection::vec(
            (any::<prop::sample::Index>(), -20i32..20, 0usize..4, 0i32..6),
            1..30,
        )
        .prop_map(|specs| {
            let mut units = Vec::with_capacity(specs.len());
            let mut leaves = Vec::new();
            for (i, (parent, order, contacts, level)) in specs.into_iter().enumerate() {
                let id = Id::new(&format!("u{i}"));
                let placement = if i == 0 {
                    Placement::root(0.0)
                } else {
                    let parent = Id::new(&format!("u{}", parent.index(i)));
                    Placement::child_of(parent, f64::from(order))
                };
                units.push(OrgUnit::new(id, Id::new("acme"), "unit", placement));
                for c in 0..contacts {
                    let leaf_id = Id::new(&format!("u{i}c{c}"));
                    leaves.push(LeafItem::new(leaf_id, id, "Name", "x".repeat(c + 1), level));
                }
            }
            (units, leaves)
        })
    }

    fn check_layout_is_deterministic(
        units: Vec<OrgUnit>,
        leaves: Vec<LeafItem>,
    ) -> Result<(), TestCaseError> {
        let tree = build_tree(&units, &leaves).expect("non-empty input builds a tree");
        let first = engine().layout_tree(&tree, Point::default());
        let second = engine().layout_tree(&tree, Point::default());
        prop_assert_eq!(first, second);
        Ok(())
    }

    fn check_siblings_do_not_overlap(
        units: Vec<OrgUnit>,
        leaves: Vec<LeafItem>,
    ) -> Result<(), TestCaseError> {
        let tree = build_tree(&units, &leaves).expect("non-empty input builds a tree");
        let root = engine().layout_tree(&tree, Point::default());
        for node in root.walk() {
            for pair in node.children().windows(2) {
                prop_assert!(pair[0].bounds().max_y() < pair[1].bounds().min_y());
                prop_assert!(pair[0].subtree_max_y() < pair[1].subtree_min_y());
            }
        }
        Ok(())
    }

    fn check_subtree_max_covers_descendants(
        units: Vec<OrgUnit>,
        leaves: Vec<LeafItem>,
    ) -> Result<(), TestCaseError> {
        let tree = build_tree(&units, &leaves).expect("non-empty input builds a tree");
        let root = engine().layout_tree(&tree, Point::default());
        for node in root.walk() {
            for descendant in node.walk() {
                prop_assert!(node.subtree_max_y() >= descendant.bounds().max_y());
                prop_assert!(node.subtree_min_y() <= descendant.bounds().min_y());
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn layout_is_deterministic((units, leaves) in tree_strategy()) {
            check_layout_is_deterministic(units, leaves)?;
        }

        #[test]
        fn siblings_do_not_overlap((units, leaves) in tree_strategy()) {
            check_siblings_do_not_overlap(units, leaves)?;
        }

        #[test]
        fn subtree_max_covers_descendants((units, leaves) in tree_strategy()) {
            check_subtree_max_covers_descendants(units, leaves)?;
        }
    }
}
