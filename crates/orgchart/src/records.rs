//! Flat record sets and the edits applied to them.
//!
//! [`ChartRecords`] is the caller-owned source of truth. Nothing in the
//! engine mutates it in place: every structural change is an [`EditSet`] of
//! replacement records, and [`ChartRecords::apply`] builds a new record set
//! from it.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use orgchart_core::{
    identifier::Id,
    record::{LeafItem, ORDER_SENTINEL, OrgUnit, Placement},
};

use crate::error::OrgChartError;

/// A single "replace record X with value Y" edit.
///
/// Applying an edit for an id that does not exist yet appends the record.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Unit(OrgUnit),
    Leaf(LeafItem),
}

/// Ordered list of record replacements produced by one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit replacement. A later edit of the same unit wins.
    pub fn push_unit(&mut self, unit: OrgUnit) {
        self.edits.push(Edit::Unit(unit));
    }

    /// Adds a leaf replacement. A later edit of the same leaf wins.
    pub fn push_leaf(&mut self, leaf: LeafItem) {
        self.edits.push(Edit::Leaf(leaf));
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter()
    }

    /// Returns the last edited value of unit `id`, if this set touches it.
    pub fn unit(&self, id: Id) -> Option<&OrgUnit> {
        self.edits.iter().rev().find_map(|edit| match edit {
            Edit::Unit(unit) if unit.id() == id => Some(unit),
            _ => None,
        })
    }

    /// Returns the last edited value of leaf `id`, if this set touches it.
    pub fn leaf(&self, id: Id) -> Option<&LeafItem> {
        self.edits.iter().rev().find_map(|edit| match edit {
            Edit::Leaf(leaf) if leaf.id() == id => Some(leaf),
            _ => None,
        })
    }
}

impl Extend<Edit> for EditSet {
    fn extend<T: IntoIterator<Item = Edit>>(&mut self, iter: T) {
        self.edits.extend(iter);
    }
}

/// Units and leaf items of one chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartRecords {
    #[serde(default)]
    units: Vec<OrgUnit>,
    #[serde(default)]
    leaves: Vec<LeafItem>,
}

impl ChartRecords {
    pub fn new(units: Vec<OrgUnit>, leaves: Vec<LeafItem>) -> Self {
        Self { units, leaves }
    }

    pub fn units(&self) -> &[OrgUnit] {
        &self.units
    }

    pub fn leaves(&self) -> &[LeafItem] {
        &self.leaves
    }

    /// Restricts the records to one owner scope. Leaves are kept when their
    /// unit is in scope.
    pub fn for_owner(&self, owner: Id) -> Self {
        let units: Vec<OrgUnit> = self
            .units
            .iter()
            .filter(|unit| unit.owner() == owner)
            .cloned()
            .collect();
        let leaves = self
            .leaves
            .iter()
            .filter(|leaf| units.iter().any(|unit| unit.id() == leaf.unit()))
            .cloned()
            .collect();
        Self { units, leaves }
    }

    /// Units that take part in the hierarchy, in record order.
    pub fn placed_units(&self) -> impl Iterator<Item = &OrgUnit> {
        self.units.iter().filter(|unit| unit.is_placed())
    }

    /// Units waiting for placement, in record order.
    pub fn unplaced_units(&self) -> impl Iterator<Item = &OrgUnit> {
        self.units.iter().filter(|unit| !unit.is_placed())
    }

    pub fn unit(&self, id: Id) -> Option<&OrgUnit> {
        self.units.iter().find(|unit| unit.id() == id)
    }

    pub fn leaf(&self, id: Id) -> Option<&LeafItem> {
        self.leaves.iter().find(|leaf| leaf.id() == id)
    }

    /// Placed units whose parent is `id`, in record order.
    pub fn children_of(&self, id: Id) -> impl Iterator<Item = &OrgUnit> {
        self.units
            .iter()
            .filter(move |unit| unit.parent() == Some(id))
    }

    pub fn has_children(&self, id: Id) -> bool {
        self.children_of(id).next().is_some()
    }

    /// Leaf items attached to unit `id`, in record order.
    pub fn leaves_of(&self, id: Id) -> impl Iterator<Item = &LeafItem> {
        self.leaves.iter().filter(move |leaf| leaf.unit() == id)
    }

    /// `true` if some placed unit has no parent.
    pub fn has_root(&self) -> bool {
        self.units.iter().any(OrgUnit::is_root_candidate)
    }

    /// Builds a new record set with `edits` applied.
    ///
    /// Records keep their position; edits for unknown ids are appended.
    pub fn apply(&self, edits: &EditSet) -> Self {
        let mut units = self.units.clone();
        let mut leaves = self.leaves.clone();

        for edit in edits.iter() {
            match edit {
                Edit::Unit(unit) => {
                    match units.iter().position(|existing| existing.id() == unit.id()) {
                        Some(idx) => units[idx] = unit.clone(),
                        None => units.push(unit.clone()),
                    }
                }
                Edit::Leaf(leaf) => {
                    match leaves.iter().position(|existing| existing.id() == leaf.id()) {
                        Some(idx) => leaves[idx] = leaf.clone(),
                        None => leaves.push(leaf.clone()),
                    }
                }
            }
        }

        debug!(edits = edits.len(); "Applied edit set");
        Self { units, leaves }
    }

    /// Creates a unit for `owner`.
    ///
    /// The new unit waits in the detached band when the scope already has a
    /// root; otherwise it becomes the root.
    pub fn with_new_unit(&self, id: Id, owner: Id, name: &str) -> Result<Self, OrgChartError> {
        if self.unit(id).is_some() {
            return Err(OrgChartError::Records(format!("unit `{id}` already exists")));
        }

        let has_root = self
            .units
            .iter()
            .any(|unit| unit.owner() == owner && unit.is_root_candidate());
        let placement = if has_root {
            Placement::Unplaced
        } else {
            warn!(owner:% = owner; "No existing root found, new unit becomes the root");
            Placement::root(ORDER_SENTINEL)
        };

        let mut edits = EditSet::new();
        edits.push_unit(OrgUnit::new(id, owner, name, placement));
        Ok(self.apply(&edits))
    }

    /// Attaches a new leaf item.
    ///
    /// # Errors
    ///
    /// Fails if the leaf id is taken or its unit does not exist.
    pub fn with_new_leaf(&self, leaf: LeafItem) -> Result<Self, OrgChartError> {
        if self.leaf(leaf.id()).is_some() {
            return Err(OrgChartError::Records(format!(
                "leaf item `{}` already exists",
                leaf.id()
            )));
        }
        if self.unit(leaf.unit()).is_none() {
            return Err(OrgChartError::UnknownUnit(leaf.unit()));
        }

        let mut edits = EditSet::new();
        edits.push_leaf(leaf);
        Ok(self.apply(&edits))
    }

    /// Removes unit `id`. Its former children move to the root level with
    /// the sentinel order key; their own subtrees stay intact.
    ///
    /// # Errors
    ///
    /// Returns [`OrgChartError::UnknownUnit`] if `id` does not exist.
    pub fn without_unit(&self, id: Id) -> Result<Self, OrgChartError> {
        if self.unit(id).is_none() {
            return Err(OrgChartError::UnknownUnit(id));
        }

        let units = self
            .units
            .iter()
            .filter(|unit| unit.id() != id)
            .map(|unit| {
                if unit.parent() == Some(id) {
                    unit.with_placement(Placement::root(ORDER_SENTINEL))
                } else {
                    unit.clone()
                }
            })
            .collect();

        debug!(unit:% = id; "Deleted unit");
        Ok(Self {
            units,
            leaves: self.leaves.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, placement: Placement) -> OrgUnit {
        OrgUnit::new(Id::new(id), Id::new("acme"), id, placement)
    }

    fn sample() -> ChartRecords {
        ChartRecords::new(
            vec![
                unit("A", Placement::root(10.0)),
                unit("B", Placement::child_of(Id::new("A"), 10.0)),
                unit("C", Placement::child_of(Id::new("A"), 20.0)),
                unit("D", Placement::child_of(Id::new("C"), 10.0)),
            ],
            vec![LeafItem::new(Id::new("L"), Id::new("B"), "Ito", "Ken", 2)],
        )
    }

    #[test]
    fn test_delete_reparents_children_to_root() {
        let records = sample().without_unit(Id::new("A")).unwrap();

        assert!(records.unit(Id::new("A")).is_none());
        for id in ["B", "C"] {
            assert_eq!(
                records.unit(Id::new(id)).unwrap().placement(),
                Placement::root(ORDER_SENTINEL)
            );
        }
        // Grandchildren keep their parent.
        assert_eq!(records.unit(Id::new("D")).unwrap().parent(), Some(Id::new("C")));
        assert_eq!(records.units().len(), 3);
    }

    #[test]
    fn test_delete_unknown_unit() {
        let err = sample().without_unit(Id::new("nope")).unwrap_err();
        assert!(matches!(err, OrgChartError::UnknownUnit(_)));
    }

    #[test]
    fn test_apply_replaces_in_place_and_appends() {
        let records = sample();
        let mut edits = EditSet::new();
        edits.push_unit(unit("B", Placement::child_of(Id::new("C"), 30.0)));
        edits.push_unit(unit("E", Placement::Unplaced));

        let updated = records.apply(&edits);

        assert_eq!(updated.units()[1].parent(), Some(Id::new("C")));
        assert_eq!(updated.units()[4].id(), Id::new("E"));
        // Original set untouched.
        assert_eq!(records.units()[1].parent(), Some(Id::new("A")));
        assert_eq!(records.units().len(), 4);
    }

    #[test]
    fn test_new_unit_is_unplaced_when_root_exists() {
        let records = sample()
            .with_new_unit(Id::new("N"), Id::new("acme"), "New team")
            .unwrap();
        assert_eq!(records.unit(Id::new("N")).unwrap().placement(), Placement::Unplaced);
    }

    #[test]
    fn test_new_unit_becomes_root_in_empty_scope() {
        let records = ChartRecords::default()
            .with_new_unit(Id::new("N"), Id::new("acme"), "HQ")
            .unwrap();
        assert_eq!(
            records.unit(Id::new("N")).unwrap().placement(),
            Placement::root(ORDER_SENTINEL)
        );
    }

    #[test]
    fn test_new_unit_duplicate_id() {
        let result = sample().with_new_unit(Id::new("A"), Id::new("acme"), "dup");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_leaf_requires_unit() {
        let leaf = LeafItem::new(Id::new("L2"), Id::new("ghost"), "Abe", "Yuki", 1);
        assert!(matches!(
            sample().with_new_leaf(leaf),
            Err(OrgChartError::UnknownUnit(_))
        ));

        let leaf = LeafItem::new(Id::new("L2"), Id::new("C"), "Abe", "Yuki", 1);
        let records = sample().with_new_leaf(leaf).unwrap();
        assert_eq!(records.leaves_of(Id::new("C")).count(), 1);
    }

    #[test]
    fn test_for_owner_filters_units_and_leaves() {
        let mut records = sample();
        let mut edits = EditSet::new();
        edits.push_unit(OrgUnit::new(
            Id::new("X"),
            Id::new("globex"),
            "Other",
            Placement::root(10.0),
        ));
        edits.push_leaf(LeafItem::new(Id::new("LX"), Id::new("X"), "Sato", "Mei", 1));
        records = records.apply(&edits);

        let scoped = records.for_owner(Id::new("globex"));
        assert_eq!(scoped.units().len(), 1);
        assert_eq!(scoped.leaves().len(), 1);
        assert_eq!(scoped.leaves()[0].id(), Id::new("LX"));
    }

    #[test]
    fn test_children_of() {
        let records = sample();
        let children: Vec<Id> = records.children_of(Id::new("A")).map(OrgUnit::id).collect();
        assert_eq!(children, vec![Id::new("B"), Id::new("C")]);
        assert!(!records.has_children(Id::new("B")));
    }

    #[test]
    fn test_has_root() {
        assert!(sample().has_root());
        let records = ChartRecords::new(
            vec![
                unit("X", Placement::Unplaced),
                unit("Y", Placement::child_of(Id::new("X"), 10.0)),
            ],
            vec![],
        );
        assert!(!records.has_root());
        assert!(!ChartRecords::default().has_root());
    }
}
