//! Ancestor/descendant queries.
//!
//! Used to veto moves that would place a unit under its own subtree.

use std::collections::HashSet;

use orgchart_core::identifier::Id;

use crate::{hit::find_node, layout::PositionedNode, records::ChartRecords};

/// `true` if `candidate` lies in the subtree of `ancestor`, the ancestor
/// itself included. `false` when `ancestor` is not in the tree.
pub fn is_descendant(root: &PositionedNode, ancestor: Id, candidate: Id) -> bool {
    find_node(root, ancestor).is_some_and(|node| contains(node, candidate))
}

/// `true` if `node` or one of its descendants is unit `id`.
pub fn contains(node: &PositionedNode, id: Id) -> bool {
    node.walk().any(|descendant| descendant.id() == id)
}

/// Same query as [`is_descendant`], answered by walking parent links in the
/// records. Covers units that are not part of the laid-out tree.
pub fn is_descendant_in_records(records: &ChartRecords, ancestor: Id, candidate: Id) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(candidate);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        if !visited.insert(id) {
            return false;
        }
        current = records.unit(id).and_then(|unit| unit.parent());
    }
    false
}
