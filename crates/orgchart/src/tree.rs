//! Rooted, ordered tree built from flat unit records.
//!
//! [`build_tree`] turns `(id, parent, order)` records plus attached leaf
//! items into a [`TreeNode`] hierarchy:
//!
//! 1. Units are stable-sorted by order key; ties keep their record order.
//! 2. Each unit whose parent exists is appended to that parent's children,
//!    so children arrive already sorted.
//! 3. The root is the first sorted unit without a known parent, or the first
//!    sorted unit if every unit has one (a cycle).
//! 4. Leaf items attach to their unit in record order.
//!
//! Units unreachable from the chosen root (other roots of the forest, or
//! members of a cycle) are not part of the tree.

use std::collections::HashSet;

use indexmap::{IndexMap, map::Entry};
use log::{debug, trace, warn};

use orgchart_core::{
    identifier::Id,
    record::{LeafItem, OrgUnit},
};

/// One unit with its ordered children and attached leaf items.
///
/// Trees are rebuilt from records on every change and never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    unit: OrgUnit,
    children: Vec<TreeNode>,
    leaves: Vec<LeafItem>,
}

impl TreeNode {
    pub fn unit(&self) -> &OrgUnit {
        &self.unit
    }

    pub fn id(&self) -> Id {
        self.unit.id()
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn leaves(&self) -> &[LeafItem] {
        &self.leaves
    }

    /// `true` when the unit has no child units (it may still have leaves).
    pub fn is_leaf_unit(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of units in this subtree, including this one.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    /// Unit ids of this subtree in pre-order.
    pub fn ids(&self) -> Vec<Id> {
        let mut ids = Vec::with_capacity(self.len());
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<Id>) {
        ids.push(self.id());
        for child in &self.children {
            child.collect_ids(ids);
        }
    }

    /// Finds the node of unit `id` in this subtree.
    pub fn find(&self, id: Id) -> Option<&TreeNode> {
        if self.id() == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Builds the chart tree from placed units and leaf items.
///
/// Unplaced units are ignored. Returns `None` when there is no placed unit;
/// callers lay out an empty chart in that case.
pub fn build_tree<'a, I>(units: I, leaves: &[LeafItem]) -> Option<TreeNode>
where
    I: IntoIterator<Item = &'a OrgUnit>,
{
    let mut sorted: Vec<&OrgUnit> = units.into_iter().filter(|unit| unit.is_placed()).collect();
    if sorted.is_empty() {
        debug!("No placed units, nothing to build");
        return None;
    }
    sorted.sort_by(|a, b| {
        let a = a.order().unwrap_or_default();
        let b = b.order().unwrap_or_default();
        a.total_cmp(&b)
    });

    let mut index: IndexMap<Id, usize> = IndexMap::with_capacity(sorted.len());
    for (idx, unit) in sorted.iter().enumerate() {
        match index.entry(unit.id()) {
            Entry::Vacant(entry) => {
                entry.insert(idx);
            }
            Entry::Occupied(_) => {
                warn!(unit:% = unit.id(); "Duplicate unit id, keeping the first record");
            }
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); sorted.len()];
    for (idx, unit) in sorted.iter().enumerate() {
        if index.get(&unit.id()) != Some(&idx) {
            continue;
        }
        if let Some(parent_idx) = unit.parent().and_then(|parent| index.get(&parent)) {
            children[*parent_idx].push(idx);
        }
    }

    let root_idx = sorted
        .iter()
        .position(|unit| {
            unit.parent()
                .is_none_or(|parent| !index.contains_key(&parent))
        })
        .unwrap_or_else(|| {
            warn!("Every unit has a parent, falling back to the first unit as root");
            0
        });

    let mut attached: Vec<Vec<LeafItem>> = vec![Vec::new(); sorted.len()];
    for leaf in leaves {
        match index.get(&leaf.unit()) {
            Some(&idx) => attached[idx].push(leaf.clone()),
            None => trace!(leaf:% = leaf.id(); "Leaf item without a placed unit"),
        }
    }

    let mut visited = HashSet::with_capacity(sorted.len());
    let root = assemble(root_idx, &sorted, &children, &mut attached, &mut visited);

    debug!(
        root:% = root.id(),
        units = root.len(),
        records = sorted.len();
        "Built chart tree"
    );
    Some(root)
}

fn assemble(
    idx: usize,
    sorted: &[&OrgUnit],
    children: &[Vec<usize>],
    attached: &mut [Vec<LeafItem>],
    visited: &mut HashSet<usize>,
) -> TreeNode {
    visited.insert(idx);

    let mut child_nodes = Vec::with_capacity(children[idx].len());
    for &child_idx in &children[idx] {
        if visited.contains(&child_idx) {
            warn!(unit:% = sorted[child_idx].id(); "Cycle in parent links, dropping edge");
            continue;
        }
        child_nodes.push(assemble(child_idx, sorted, children, attached, visited));
    }

    TreeNode {
        unit: sorted[idx].clone(),
        children: child_nodes,
        leaves: std::mem::take(&mut attached[idx]),
    }
}
