//! Dense renumbering of sibling order keys.

use log::debug;

use orgchart_core::{
    identifier::Id,
    record::{OrgUnit, Placement},
};

use crate::records::EditSet;

/// Reassigns sibling order keys to `increment, 2 * increment, ...`.
///
/// # Examples
///
/// ```
/// use orgchart::renumber::OrderRenumberer;
/// use orgchart_core::{identifier::Id, record::{OrgUnit, Placement}};
///
/// let parent = Id::new("hq");
/// let unit = |id: &str, order| {
///     OrgUnit::new(Id::new(id), Id::new("acme"), id, Placement::child_of(parent, order))
/// };
/// let siblings = [unit("a", 10.0), unit("b", 15.0), unit("c", 30.0)];
///
/// // Move "c" to the front.
/// let edits = OrderRenumberer::new(10.0).renumber(&siblings, &siblings[2], Some(parent), 0);
///
/// assert_eq!(edits.unit(Id::new("c")).unwrap().order(), Some(10.0));
/// assert_eq!(edits.unit(Id::new("a")).unwrap().order(), Some(20.0));
/// assert_eq!(edits.unit(Id::new("b")).unwrap().order(), Some(30.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderRenumberer {
    increment: f64,
}

impl OrderRenumberer {
    pub fn new(increment: f64) -> Self {
        Self { increment }
    }

    /// Places `moved` at `index` among `siblings` under `parent` and renumbers
    /// the whole list.
    ///
    /// `siblings` may or may not contain `moved`. They are sorted by their
    /// current key first, ties keeping slice order. `index` is clamped to the
    /// list length. Only units whose placement changes are returned.
    pub fn renumber<'a, I>(
        &self,
        siblings: I,
        moved: &'a OrgUnit,
        parent: Option<Id>,
        index: usize,
    ) -> EditSet
    where
        I: IntoIterator<Item = &'a OrgUnit>,
    {
        let mut ordered: Vec<&OrgUnit> = siblings
            .into_iter()
            .filter(|sibling| sibling.id() != moved.id())
            .collect();
        ordered.sort_by(|a, b| {
            let a = a.order().unwrap_or_default();
            let b = b.order().unwrap_or_default();
            a.total_cmp(&b)
        });
        ordered.insert(index.min(ordered.len()), moved);

        let mut edits = EditSet::new();
        for (position, unit) in ordered.into_iter().enumerate() {
            let placement = Placement::Placed {
                parent,
                order: (position + 1) as f64 * self.increment,
            };
            if unit.placement() != placement {
                edits.push_unit(unit.with_placement(placement));
            }
        }

        debug!(moved:% = moved.id(), index, changed = edits.len(); "Renumbered siblings");
        edits
    }
}

impl Default for OrderRenumberer {
    fn default() -> Self {
        Self::new(10.0)
    }
}
