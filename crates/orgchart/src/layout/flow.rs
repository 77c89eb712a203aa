//! Flow layout for units that are not placed in the hierarchy yet.
//!
//! Detached units are fixed-size boxes laid left to right in a fixed band.
//! They have no children and no contact slots.

use log::debug;

use orgchart_core::{
    geometry::{Bounds, Point, Size},
    record::{LeafItem, OrgUnit},
};

use super::{LayoutEngine, PositionedNode};

impl LayoutEngine {
    /// Lays out `units` in the detached band, in iteration order.
    pub fn layout_detached<'a, I>(&self, units: I, leaves: &[LeafItem]) -> Vec<PositionedNode>
    where
        I: IntoIterator<Item = &'a OrgUnit>,
    {
        let config = &self.config;
        let size = Size::new(config.detached_width(), config.detached_height());
        let step = config.detached_width() + config.detached_gap();

        let detached: Vec<PositionedNode> = units
            .into_iter()
            .enumerate()
            .map(|(idx, unit)| {
                let origin = Point::new(idx as f32 * step, config.detached_band_y());
                let bounds = Bounds::new_from_top_left(origin, size);
                PositionedNode {
                    unit: unit.clone(),
                    leaves: leaves
                        .iter()
                        .filter(|leaf| leaf.unit() == unit.id())
                        .cloned()
                        .collect(),
                    bounds,
                    subtree_min_y: bounds.min_y(),
                    subtree_max_y: bounds.max_y(),
                    fill_color: self.detached_color,
                    leaf_slots: Vec::new(),
                    children: Vec::new(),
                }
            })
            .collect();

        if !detached.is_empty() {
            debug!(count = detached.len(); "Laid out detached units");
        }
        detached
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use orgchart_core::{
        color::{Color, LevelPalette},
        identifier::Id,
        record::Placement,
    };

    use super::*;
    use crate::config::{LayoutConfig, TextMeasureKind};

    #[test]
    fn test_detached_units_flow_left_to_right() {
        let config = LayoutConfig::default().with_text_measure(TextMeasureKind::Estimate);
        let new_color = Color::new("#ffe").unwrap();
        let engine = LayoutEngine::new(config, LevelPalette::default(), new_color);

        let units: Vec<OrgUnit> = ["N1", "N2", "N3"]
            .iter()
            .map(|id| OrgUnit::new(Id::new(id), Id::new("acme"), *id, Placement::Unplaced))
            .collect();
        let leaves = [LeafItem::new(Id::new("c"), Id::new("N2"), "Ito", "Ken", 3)];

        let detached = engine.layout_detached(&units, &leaves);

        assert_eq!(detached.len(), 3);
        for (idx, node) in detached.iter().enumerate() {
            assert_approx_eq!(f32, node.bounds().min_x(), idx as f32 * 140.0);
            assert_approx_eq!(f32, node.bounds().min_y(), 200.0);
            assert_approx_eq!(f32, node.bounds().width(), 120.0);
            assert_approx_eq!(f32, node.bounds().height(), 50.0);
            assert_eq!(node.fill_color(), new_color);
            assert!(node.leaf_slots().is_empty());
        }
        assert_eq!(detached[1].leaves().len(), 1);
    }

    #[test]
    fn test_no_detached_units() {
        let config = LayoutConfig::default().with_text_measure(TextMeasureKind::Estimate);
        let engine = LayoutEngine::new(config, LevelPalette::default(), Color::default());
        assert!(engine.layout_detached(&[], &[]).is_empty());
    }
}
