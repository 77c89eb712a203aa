//! Drop classification and structural edit planning.
//!
//! A drop is turned into an [`EditSet`] in two steps: the pointer position
//! over the target box picks a [`DropMode`], then [`DropPlanner`] computes
//! the replacement records for that mode. Planning is pure; records are only
//! changed when the caller applies the edit set.
//!
//! # Unit drops
//!
//! | Mode     | Effect                                                         |
//! |----------|----------------------------------------------------------------|
//! | `Parent` | Appended under the target, or spliced between the target and its children |
//! | `Before` | Sibling of the target, ordered just before it                  |
//! | `After`  | Sibling of the target, ordered just after it                   |
//!
//! A unit can never be moved into its own subtree. Dropping onto an id that
//! does not exist detaches the unit to the root level.
//!
//! # Sibling order keys
//!
//! `Before`/`After` inserts only touch the moved unit whenever a free key
//! exists: the target's key offset by `insert_offset` if that stays clear of
//! the neighbour on that side, else the midpoint between target and
//! neighbour. When the two keys are equal or too close to split, the whole
//! sibling list is renumbered.

use std::fmt;

use log::{debug, info, warn};

use orgchart_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    record::{ORDER_SENTINEL, OrgUnit, Placement},
};

use crate::{
    config::InteractionConfig,
    error::OrgChartError,
    hit::{LeafHit, find_node},
    layout::ChartLayout,
    records::{ChartRecords, EditSet},
    relation::{is_descendant, is_descendant_in_records},
    renumber::OrderRenumberer,
};

/// Structural effect of dropping onto a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropMode {
    /// Become a child of the target.
    Parent,
    /// Become the sibling right before the target.
    Before,
    /// Become the sibling right after the target.
    After,
}

impl DropMode {
    /// Classifies `point` relative to the target box.
    ///
    /// Right of `parent_zone_ratio` of the width is `Parent`; otherwise the
    /// upper half is `Before` and the lower half `After`.
    ///
    /// ```
    /// # use orgchart::drop::DropMode;
    /// # use orgchart_core::geometry::{Bounds, Point, Size};
    /// let target = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 60.0));
    ///
    /// assert_eq!(DropMode::classify(target, Point::new(80.0, 10.0), 0.75), DropMode::Parent);
    /// assert_eq!(DropMode::classify(target, Point::new(50.0, 10.0), 0.75), DropMode::Before);
    /// assert_eq!(DropMode::classify(target, Point::new(50.0, 30.0), 0.75), DropMode::After);
    /// ```
    pub fn classify(target: Bounds, point: Point, parent_zone_ratio: f32) -> Self {
        if point.x() > target.min_x() + target.width() * parent_zone_ratio {
            Self::Parent
        } else if point.y() < target.center().y() {
            Self::Before
        } else {
            Self::After
        }
    }

    /// Classifies `point` over a contact slot: leading half is `Before`.
    pub fn for_leaf(hit: &LeafHit, point: Point) -> Self {
        if hit.slot().is_leading_half(point) {
            Self::Before
        } else {
            Self::After
        }
    }
}

impl fmt::Display for DropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => write!(f, "parent"),
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

/// Plans the record edits of a drop against one records/layout snapshot.
///
/// The layout must be computed from the same records.
#[derive(Debug, Clone, Copy)]
pub struct DropPlanner<'a> {
    records: &'a ChartRecords,
    layout: &'a ChartLayout,
    config: &'a InteractionConfig,
}

impl<'a> DropPlanner<'a> {
    pub fn new(
        records: &'a ChartRecords,
        layout: &'a ChartLayout,
        config: &'a InteractionConfig,
    ) -> Self {
        Self {
            records,
            layout,
            config,
        }
    }

    /// Drop mode for a pointer at `point` over `target`, or `None` if the
    /// target is not part of the laid-out tree.
    pub fn classify(&self, target: Id, point: Point) -> Option<DropMode> {
        let root = self.layout.root()?;
        let node = find_node(root, target)?;
        Some(DropMode::classify(
            node.bounds(),
            point,
            self.config.parent_zone_ratio(),
        ))
    }

    /// `true` if moving `dragged` relative to `target` would put it inside
    /// its own subtree.
    pub fn would_create_cycle(&self, dragged: Id, target: Id) -> bool {
        self.layout
            .root()
            .is_some_and(|root| is_descendant(root, dragged, target))
            || is_descendant_in_records(self.records, dragged, target)
    }

    /// Plans dropping unit `dragged` at `point` over unit `target`.
    ///
    /// # Errors
    ///
    /// See [`DropPlanner::plan_unit_drop_with_mode`]. Additionally fails with
    /// [`OrgChartError::NotPlaced`] when `target` exists but is not laid out
    /// in the tree.
    pub fn plan_unit_drop(
        &self,
        dragged: Id,
        target: Id,
        point: Point,
    ) -> Result<EditSet, OrgChartError> {
        let mode = if dragged == target || self.records.unit(target).is_none() {
            // The mode does not matter for no-ops and detaches.
            DropMode::Parent
        } else {
            self.classify(target, point)
                .ok_or(OrgChartError::NotPlaced(target))?
        };
        self.plan_unit_drop_with_mode(dragged, target, mode)
    }

    /// Plans moving unit `dragged` relative to `target` in `mode`.
    ///
    /// Returns an empty edit set when `dragged == target`.
    ///
    /// # Errors
    ///
    /// - [`OrgChartError::UnknownUnit`] if `dragged` does not exist.
    /// - [`OrgChartError::InvalidMove`] if `target` lies in the subtree of
    ///   `dragged`, whatever the mode.
    /// - [`OrgChartError::NotPlaced`] if `target` is an unplaced unit.
    pub fn plan_unit_drop_with_mode(
        &self,
        dragged: Id,
        target: Id,
        mode: DropMode,
    ) -> Result<EditSet, OrgChartError> {
        let unit = self
            .records
            .unit(dragged)
            .ok_or(OrgChartError::UnknownUnit(dragged))?;

        if dragged == target {
            debug!(unit:% = dragged; "Dropped onto itself, nothing to do");
            return Ok(EditSet::new());
        }

        let Some(target_unit) = self.records.unit(target) else {
            info!(unit:% = dragged, target:% = target; "Target does not exist, detaching to root");
            let mut edits = EditSet::new();
            edits.push_unit(unit.with_placement(Placement::root(ORDER_SENTINEL)));
            return Ok(edits);
        };

        if self.would_create_cycle(dragged, target) {
            warn!(unit:% = dragged, target:% = target, mode:%; "Rejected move into own subtree");
            return Err(OrgChartError::InvalidMove { dragged, target });
        }

        let Placement::Placed {
            parent: target_parent,
            order: target_order,
        } = target_unit.placement()
        else {
            return Err(OrgChartError::NotPlaced(target));
        };

        let edits = match mode {
            DropMode::Parent => self.plan_reparent(unit, target_unit),
            DropMode::Before | DropMode::After => {
                self.plan_sibling_insert(unit, target_unit, target_parent, target_order, mode)
            }
        };
        info!(unit:% = dragged, target:% = target, mode:%, edits = edits.len(); "Planned unit drop");
        Ok(edits)
    }

    /// Plans moving leaf item `leaf` to unit `target`. Only the leaf's unit
    /// changes.
    ///
    /// # Errors
    ///
    /// Fails if the leaf or the target unit does not exist.
    pub fn plan_leaf_drop(&self, leaf: Id, target: Id) -> Result<EditSet, OrgChartError> {
        let item = self
            .records
            .leaf(leaf)
            .ok_or(OrgChartError::UnknownLeaf(leaf))?;
        if self.records.unit(target).is_none() {
            return Err(OrgChartError::UnknownUnit(target));
        }

        let mut edits = EditSet::new();
        if item.unit() != target {
            edits.push_leaf(item.moved_to(target));
            info!(leaf:% = leaf, unit:% = target; "Planned leaf drop");
        }
        Ok(edits)
    }

    /// Plans dropping leaf item `leaf` before or after another leaf item.
    ///
    /// The leaf moves to the target's unit with a sibling order one
    /// `insert_offset` away from the target's. `Parent` is treated as a drop
    /// onto the target's unit.
    ///
    /// # Errors
    ///
    /// Fails if either leaf item does not exist.
    pub fn plan_leaf_drop_on_leaf(
        &self,
        leaf: Id,
        target: Id,
        mode: DropMode,
    ) -> Result<EditSet, OrgChartError> {
        let item = self
            .records
            .leaf(leaf)
            .ok_or(OrgChartError::UnknownLeaf(leaf))?;
        let target_item = self
            .records
            .leaf(target)
            .ok_or(OrgChartError::UnknownLeaf(target))?;

        if leaf == target {
            return Ok(EditSet::new());
        }

        let offset = self.config.insert_offset();
        let sibling_order = match mode {
            DropMode::Parent => return self.plan_leaf_drop(leaf, target_item.unit()),
            DropMode::Before => target_item.sibling_order() - offset,
            DropMode::After => target_item.sibling_order() + offset,
        };

        let mut edits = EditSet::new();
        edits.push_leaf(item.moved_to_ordered(target_item.unit(), sibling_order));
        info!(leaf:% = leaf, target:% = target, mode:%; "Planned leaf reorder");
        Ok(edits)
    }

    /// Moves `unit` to position `index` among its current siblings and
    /// renumbers them all.
    ///
    /// # Errors
    ///
    /// Fails if the unit does not exist or is not placed.
    pub fn reorder_within_parent(&self, unit: Id, index: usize) -> Result<EditSet, OrgChartError> {
        let record = self
            .records
            .unit(unit)
            .ok_or(OrgChartError::UnknownUnit(unit))?;
        let Placement::Placed { parent, .. } = record.placement() else {
            return Err(OrgChartError::NotPlaced(unit));
        };

        let siblings = self.sorted_siblings(parent, record.owner());
        Ok(self.renumberer().renumber(siblings, record, parent, index))
    }

    fn renumberer(&self) -> OrderRenumberer {
        OrderRenumberer::new(self.config.order_increment())
    }

    /// Placed units under `parent`, stable-sorted by key. Root-level
    /// siblings are limited to `owner`.
    fn sorted_siblings(&self, parent: Option<Id>, owner: Id) -> Vec<&'a OrgUnit> {
        let mut siblings: Vec<&OrgUnit> = self
            .records
            .placed_units()
            .filter(|unit| unit.parent() == parent)
            .filter(|unit| parent.is_some() || unit.owner() == owner)
            .collect();
        siblings.sort_by(|a, b| {
            let a = a.order().unwrap_or_default();
            let b = b.order().unwrap_or_default();
            a.total_cmp(&b)
        });
        siblings
    }

    fn plan_reparent(&self, unit: &OrgUnit, target: &OrgUnit) -> EditSet {
        let others: Vec<&OrgUnit> = self
            .records
            .children_of(target.id())
            .filter(|child| child.id() != unit.id())
            .collect();
        let increment = self.config.order_increment();
        let mut edits = EditSet::new();

        if !others.is_empty() && !self.records.has_children(unit.id()) {
            // Insert-between: the unit takes over the target's children.
            let order = unit.order().unwrap_or(increment);
            edits.push_unit(unit.with_placement(Placement::child_of(target.id(), order)));
            for child in others {
                let order = child.order().unwrap_or_default();
                edits.push_unit(child.with_placement(Placement::child_of(unit.id(), order)));
            }
            debug!(unit:% = unit.id(), target:% = target.id(); "Inserted between target and its children");
        } else {
            let max_order = others
                .iter()
                .filter_map(|child| child.order())
                .fold(0.0, f64::max);
            edits.push_unit(
                unit.with_placement(Placement::child_of(target.id(), max_order + increment)),
            );
        }
        edits
    }

    fn plan_sibling_insert(
        &self,
        unit: &OrgUnit,
        target: &OrgUnit,
        parent: Option<Id>,
        target_order: f64,
        mode: DropMode,
    ) -> EditSet {
        let siblings: Vec<&OrgUnit> = self
            .sorted_siblings(parent, target.owner())
            .into_iter()
            .filter(|sibling| sibling.id() != unit.id())
            .collect();
        let position = siblings
            .iter()
            .position(|sibling| sibling.id() == target.id())
            .unwrap_or_default();

        let offset = self.config.insert_offset();
        let (candidate, neighbour, index) = match mode {
            DropMode::Before => (
                target_order - offset,
                position.checked_sub(1).and_then(|idx| siblings.get(idx)),
                position,
            ),
            _ => (target_order + offset, siblings.get(position + 1), position + 1),
        };
        let neighbour_order = neighbour.and_then(|sibling| sibling.order());

        match free_key(target_order, neighbour_order, candidate) {
            Some(order) => {
                let mut edits = EditSet::new();
                edits.push_unit(unit.with_placement(Placement::Placed { parent, order }));
                edits
            }
            None => {
                debug!(
                    unit:% = unit.id(),
                    target:% = target.id(),
                    target_order;
                    "No free order key, renumbering siblings"
                );
                self.renumberer().renumber(siblings, unit, parent, index)
            }
        }
    }
}

/// Picks a key strictly between `target` and `neighbour` (or past `target`
/// when there is no neighbour), preferring `candidate`.
fn free_key(target: f64, neighbour: Option<f64>, candidate: f64) -> Option<f64> {
    let Some(neighbour) = neighbour else {
        return (candidate != target).then_some(candidate);
    };
    let (low, high) = if neighbour < target {
        (neighbour, target)
    } else {
        (target, neighbour)
    };
    let is_free = |key: f64| key > low && key < high;

    if is_free(candidate) {
        return Some(candidate);
    }
    let midpoint = low + (high - low) / 2.0;
    is_free(midpoint).then_some(midpoint)
}
