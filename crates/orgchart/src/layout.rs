//! Chart layout
//!
//! Turns records into positioned boxes in logical chart coordinates:
//!
//! - the main tree is placed by a recursive left-to-right, top-to-bottom
//!   tidy layout (`tidy` module);
//! - unplaced units are placed by a flow layout in a fixed band (`flow`
//!   module);
//! - contact slots inside each unit box are computed for hit-testing
//!   (`slots` module).
//!
//! Layout is a pure function of the records, the configuration and the text
//! measurer. Two passes over identical inputs produce identical coordinates.

mod flow;
mod slots;
mod tidy;

pub use slots::{LeafSlot, SlotOrientation};

use std::rc::Rc;

use log::{debug, info};
use serde::Serialize;

use orgchart_core::{
    color::{Color, LevelPalette},
    geometry::{Bounds, Point},
    identifier::Id,
    record::{LeafItem, OrgUnit},
    text::{CosmicTextMeasure, EstimatedTextMeasure, TextMeasure, TextStyle},
};

use crate::{
    config::{LayoutConfig, TextMeasureKind},
    records::ChartRecords,
    tree::{TreeNode, build_tree},
};

/// A unit box with its computed geometry and its positioned children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    unit: OrgUnit,
    leaves: Vec<LeafItem>,
    bounds: Bounds,
    subtree_min_y: f32,
    subtree_max_y: f32,
    fill_color: Color,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    leaf_slots: Vec<LeafSlot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<PositionedNode>,
}

impl PositionedNode {
    pub fn unit(&self) -> &OrgUnit {
        &self.unit
    }

    pub fn id(&self) -> Id {
        self.unit.id()
    }

    pub fn leaves(&self) -> &[LeafItem] {
        &self.leaves
    }

    pub fn children(&self) -> &[PositionedNode] {
        &self.children
    }

    /// Box of this unit, top-left anchored.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Top of the subtree; equal to the top of this unit's box.
    pub fn subtree_min_y(&self) -> f32 {
        self.subtree_min_y
    }

    /// Bottom of the lowest box in the subtree.
    pub fn subtree_max_y(&self) -> f32 {
        self.subtree_max_y
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    /// Contact slots, sorted by sibling order.
    pub fn leaf_slots(&self) -> &[LeafSlot] {
        &self.leaf_slots
    }

    pub fn is_leaf_unit(&self) -> bool {
        self.children.is_empty()
    }

    /// Visits this node and its descendants in pre-order.
    pub fn walk(&self) -> impl Iterator<Item = &PositionedNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Output of one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<PositionedNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    detached: Vec<PositionedNode>,
}

impl ChartLayout {
    /// The positioned main tree, or `None` when no unit is placed.
    pub fn root(&self) -> Option<&PositionedNode> {
        self.root.as_ref()
    }

    /// Unplaced units, left to right.
    pub fn detached(&self) -> &[PositionedNode] {
        &self.detached
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.detached.is_empty()
    }

    /// Smallest box holding every positioned unit.
    pub fn bounds(&self) -> Option<Bounds> {
        self.root
            .iter()
            .flat_map(PositionedNode::walk)
            .chain(self.detached.iter())
            .map(PositionedNode::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

/// Computes [`ChartLayout`]s.
///
/// # Examples
///
/// ```
/// use orgchart::{
///     config::{LayoutConfig, TextMeasureKind},
///     layout::LayoutEngine,
///     records::ChartRecords,
/// };
/// use orgchart_core::{
///     color::{Color, LevelPalette},
///     identifier::Id,
///     record::{OrgUnit, Placement},
/// };
///
/// let config = LayoutConfig::default().with_text_measure(TextMeasureKind::Estimate);
/// let engine = LayoutEngine::new(config, LevelPalette::default(), Color::default());
///
/// let records = ChartRecords::new(
///     vec![OrgUnit::new(Id::new("hq"), Id::new("acme"), "HQ", Placement::root(10.0))],
///     vec![],
/// );
/// let layout = engine.layout(&records);
///
/// let root = layout.root().unwrap();
/// assert_eq!(root.bounds().width(), 150.0);
/// assert_eq!(root.bounds().height(), 60.0);
/// ```
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    text_style: TextStyle,
    palette: LevelPalette,
    detached_color: Color,
    text_measure: Rc<dyn TextMeasure>,
}

impl LayoutEngine {
    /// Creates an engine measuring text with the backend selected in `config`.
    pub fn new(config: LayoutConfig, palette: LevelPalette, detached_color: Color) -> Self {
        let text_measure: Rc<dyn TextMeasure> = match config.text_measure() {
            TextMeasureKind::Cosmic => Rc::new(CosmicTextMeasure::new()),
            TextMeasureKind::Estimate => Rc::new(EstimatedTextMeasure::default()),
        };
        Self {
            text_style: config.text_style(),
            config,
            palette,
            detached_color,
            text_measure,
        }
    }

    /// Replaces the text measurer (builder style).
    pub fn with_text_measure(mut self, text_measure: Rc<dyn TextMeasure>) -> Self {
        self.text_measure = text_measure;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out the records: placed units as a tree rooted at the origin,
    /// unplaced units in the detached band.
    pub fn layout(&self, records: &ChartRecords) -> ChartLayout {
        let root = build_tree(records.placed_units(), records.leaves())
            .map(|tree| self.layout_tree(&tree, Point::default()));
        let detached = self.layout_detached(records.unplaced_units(), records.leaves());

        info!(
            units = root.as_ref().map_or(0, |root| root.walk().count()),
            detached = detached.len();
            "Layout calculated"
        );
        ChartLayout { root, detached }
    }

    /// Lays out one tree with its root box at `origin`.
    pub fn layout_tree(&self, root: &TreeNode, origin: Point) -> PositionedNode {
        debug!(root:% = root.id(), x = origin.x(), y = origin.y(); "Laying out tree");
        self.place_subtree(root, origin)
    }

    fn label_widths(&self, leaves: &[&LeafItem]) -> Vec<f32> {
        leaves
            .iter()
            .map(|leaf| self.text_measure.text_width(&leaf.label(), &self.text_style))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use orgchart_core::record::Placement;

    use super::*;

    fn engine() -> LayoutEngine {
        let config = LayoutConfig::default().with_text_measure(TextMeasureKind::Estimate);
        LayoutEngine::new(config, LevelPalette::default(), Color::new("#ffe").unwrap())
    }

    fn unit(id: &str, placement: Placement) -> OrgUnit {
        OrgUnit::new(Id::new(id), Id::new("acme"), id, placement)
    }

    #[test]
    fn test_empty_records() {
        let layout = engine().layout(&ChartRecords::default());
        assert!(layout.is_empty());
        assert!(layout.root().is_none());
        assert!(layout.bounds().is_none());
    }

    #[test]
    fn test_layout_includes_tree_and_detached() {
        let records = ChartRecords::new(
            vec![
                unit("A", Placement::root(10.0)),
                unit("B", Placement::child_of(Id::new("A"), 10.0)),
                unit("N", Placement::Unplaced),
            ],
            vec![],
        );
        let layout = engine().layout(&records);

        let root = layout.root().unwrap();
        assert_eq!(root.id(), Id::new("A"));
        assert_eq!(root.children().len(), 1);
        assert_eq!(layout.detached().len(), 1);
        assert_eq!(layout.detached()[0].id(), Id::new("N"));

        let bounds = layout.bounds().unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 0.0);
        assert_approx_eq!(f32, bounds.max_y(), 250.0);
    }

    #[test]
    fn test_walk_is_pre_order() {
        let records = ChartRecords::new(
            vec![
                unit("A", Placement::root(10.0)),
                unit("B", Placement::child_of(Id::new("A"), 10.0)),
                unit("C", Placement::child_of(Id::new("B"), 10.0)),
                unit("D", Placement::child_of(Id::new("A"), 20.0)),
            ],
            vec![],
        );
        let layout = engine().layout(&records);
        let order: Vec<Id> = layout.root().unwrap().walk().map(PositionedNode::id).collect();
        assert_eq!(
            order,
            vec![Id::new("A"), Id::new("B"), Id::new("C"), Id::new("D")]
        );
    }

    #[test]
    fn test_layout_serializes_to_toml() {
        let records = ChartRecords::new(
            vec![
                unit("A", Placement::root(10.0)),
                unit("B", Placement::child_of(Id::new("A"), 10.0)),
            ],
            vec![LeafItem::new(Id::new("L"), Id::new("B"), "Ito", "Ken", 1)],
        );
        let layout = engine().layout(&records);
        let text = toml::to_string(&layout).unwrap();
        assert!(text.contains("subtree_max_y"));
        assert!(text.contains("leaf_slots"));
    }

    #[derive(Debug)]
    struct FixedMeasure(f32);

    impl TextMeasure for FixedMeasure {
        fn text_width(&self, _text: &str, _style: &TextStyle) -> f32 {
            self.0
        }
    }

    #[test]
    fn test_custom_text_measure_widens_leaf_unit() {
        let engine = engine().with_text_measure(Rc::new(FixedMeasure(200.0)));
        let records = ChartRecords::new(
            vec![unit("A", Placement::root(10.0))],
            vec![LeafItem::new(Id::new("L"), Id::new("A"), "Ito", "Ken", 1)],
        );
        let layout = engine.layout(&records);

        let root = layout.root().unwrap();
        assert_approx_eq!(f32, root.bounds().width(), 250.0);
        assert_approx_eq!(f32, root.leaf_slots()[0].bounds().width(), 200.0);
    }
}
