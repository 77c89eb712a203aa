//! Flat chart records: organizational units and the leaf items attached to them.
//!
//! Records are the single source of truth owned by the caller. The tree and
//! layout are derived from them and rebuilt on every change; structural
//! edits are expressed as replacement records.
//!
//! # Wire form
//!
//! Units serialize with a string `parent` and a numeric `order`:
//!
//! | `parent`   | [`Placement`]                          |
//! |------------|----------------------------------------|
//! | `""`       | `Placed { parent: None, order }`       |
//! | `"NEW"`    | `Unplaced` (`order` is ignored)        |
//! | any id     | `Placed { parent: Some(id), order }`   |

use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// Order key given to units that are moved to the root level or created
/// without a position, so that they sort after their siblings.
pub const ORDER_SENTINEL: f64 = 9999.0;

/// Wire value of `parent` for units that are not placed yet.
pub const UNPLACED_PARENT: &str = "NEW";

/// Structural position of a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Part of the hierarchy. `parent: None` makes the unit a root candidate.
    Placed { parent: Option<Id>, order: f64 },
    /// Created but not attached anywhere yet. Laid out in the detached band.
    Unplaced,
}

impl Placement {
    /// A root-level placement with the given order key.
    pub fn root(order: f64) -> Self {
        Self::Placed {
            parent: None,
            order,
        }
    }

    /// A placement under `parent` with the given order key.
    pub fn child_of(parent: Id, order: f64) -> Self {
        Self::Placed {
            parent: Some(parent),
            order,
        }
    }
}

/// One node of the hierarchy (company, organization, department ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOrgUnit", into = "RawOrgUnit")]
pub struct OrgUnit {
    id: Id,
    placement: Placement,
    owner: Id,
    name: String,
    memo: String,
}

impl OrgUnit {
    pub fn new(id: Id, owner: Id, name: impl Into<String>, placement: Placement) -> Self {
        Self {
            id,
            placement,
            owner,
            name: name.into(),
            memo: String::new(),
        }
    }

    /// Sets the memo text (builder style).
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Returns a copy of this unit with a different placement.
    pub fn with_placement(&self, placement: Placement) -> Self {
        Self {
            placement,
            ..self.clone()
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Owner scope (company) the unit belongs to.
    pub fn owner(&self) -> Id {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Parent id of a placed unit. `None` for roots and unplaced units.
    pub fn parent(&self) -> Option<Id> {
        match self.placement {
            Placement::Placed { parent, .. } => parent,
            Placement::Unplaced => None,
        }
    }

    /// Order key of a placed unit.
    pub fn order(&self) -> Option<f64> {
        match self.placement {
            Placement::Placed { order, .. } => Some(order),
            Placement::Unplaced => None,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.placement, Placement::Placed { .. })
    }

    /// `true` for placed units without a parent.
    pub fn is_root_candidate(&self) -> bool {
        matches!(self.placement, Placement::Placed { parent: None, .. })
    }
}

#[derive(Serialize, Deserialize)]
struct RawOrgUnit {
    id: Id,
    #[serde(default)]
    parent: String,
    #[serde(default)]
    order: f64,
    owner: Id,
    #[serde(default)]
    name: String,
    #[serde(default)]
    memo: String,
}

impl TryFrom<RawOrgUnit> for OrgUnit {
    type Error = String;

    fn try_from(raw: RawOrgUnit) -> Result<Self, Self::Error> {
        if !raw.order.is_finite() {
            return Err(format!("unit `{}` has a non-finite order", raw.id));
        }
        let placement = match raw.parent.as_str() {
            UNPLACED_PARENT => Placement::Unplaced,
            "" => Placement::root(raw.order),
            parent if parent == raw.id.as_string() => {
                return Err(format!("unit `{}` cannot be its own parent", raw.id));
            }
            parent => Placement::child_of(Id::new(parent), raw.order),
        };
        Ok(Self {
            id: raw.id,
            placement,
            owner: raw.owner,
            name: raw.name,
            memo: raw.memo,
        })
    }
}

impl From<OrgUnit> for RawOrgUnit {
    fn from(unit: OrgUnit) -> Self {
        let (parent, order) = match unit.placement {
            Placement::Placed { parent, order } => {
                (parent.map(|id| id.as_string()).unwrap_or_default(), order)
            }
            Placement::Unplaced => (UNPLACED_PARENT.to_string(), ORDER_SENTINEL),
        };
        Self {
            id: unit.id,
            parent,
            order,
            owner: unit.owner,
            name: unit.name,
            memo: unit.memo,
        }
    }
}

/// Non-structural record attached to exactly one unit (a contact).
///
/// Leaf items affect the size and fill color of their unit's box and can be
/// dragged between units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafItem {
    id: Id,
    unit: Id,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    level: i32,
    #[serde(default)]
    key_person: bool,
    #[serde(default = "unordered")]
    sibling_order: f64,
}

/// Leaves without a sibling order sort after the ordered ones.
fn unordered() -> f64 {
    ORDER_SENTINEL
}

impl LeafItem {
    /// Max characters of a label before it is truncated.
    const LABEL_MAX_CHARS: usize = 8;

    pub fn new(
        id: Id,
        unit: Id,
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        level: i32,
    ) -> Self {
        Self {
            id,
            unit,
            last_name: last_name.into(),
            first_name: first_name.into(),
            title: String::new(),
            level,
            key_person: false,
            sibling_order: ORDER_SENTINEL,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_key_person(mut self, key_person: bool) -> Self {
        self.key_person = key_person;
        self
    }

    pub fn with_sibling_order(mut self, sibling_order: f64) -> Self {
        self.sibling_order = sibling_order;
        self
    }

    /// Returns a copy of this leaf attached to another unit.
    pub fn moved_to(&self, unit: Id) -> Self {
        Self {
            unit,
            ..self.clone()
        }
    }

    /// Returns a copy of this leaf attached to `unit` at `sibling_order`.
    pub fn moved_to_ordered(&self, unit: Id, sibling_order: f64) -> Self {
        Self {
            unit,
            sibling_order,
            ..self.clone()
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Id of the unit this leaf belongs to.
    pub fn unit(&self) -> Id {
        self.unit
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn is_key_person(&self) -> bool {
        self.key_person
    }

    pub fn sibling_order(&self) -> f64 {
        self.sibling_order
    }

    /// Display label: `"{last} {first}"`, cut to seven characters plus an
    /// ellipsis when longer than eight characters.
    ///
    /// ```
    /// # use orgchart_core::{identifier::Id, record::LeafItem};
    /// let short = LeafItem::new(Id::new("c1"), Id::new("u1"), "Ito", "Ken", 1);
    /// assert_eq!(short.label(), "Ito Ken");
    ///
    /// let long = LeafItem::new(Id::new("c2"), Id::new("u1"), "Takahashi", "Hanako", 1);
    /// assert_eq!(long.label(), "Takahas…");
    /// ```
    pub fn label(&self) -> String {
        let full = format!("{} {}", self.last_name, self.first_name);
        if full.chars().count() > Self::LABEL_MAX_CHARS {
            let mut truncated: String = full.chars().take(Self::LABEL_MAX_CHARS - 1).collect();
            truncated.push('…');
            truncated
        } else {
            full
        }
    }
}
