//! Pointer drag-and-drop session.
//!
//! [`DragSession`] is the only stateful part of the engine. It tracks one
//! gesture as a single [`DragState`] value:
//!
//! ```text
//!            pointer_down on an entity
//!   Idle ─────────────────────────────► Candidate
//!    ▲                                      │ moved more than drag_threshold
//!    │                                      ▼
//!    └──── pointer_up / pointer_leave ── Dragging
//! ```
//!
//! Releasing a `Candidate` within the threshold is a click and yields
//! [`DragEvent::Select`].
//! Releasing while `Dragging` plans a drop. Leaving the surface cancels. The
//! session is back in `Idle` after every release or leave, whatever the
//! outcome.
//!
//! The drop-target classification shown while hovering is recomputed on
//! every pointer move from the current layout and never stored.
//!
//! All pointer positions are screen coordinates; the session converts them
//! through the [`Viewport`] before hit-testing.

use std::mem;

use log::{debug, info, trace};

use orgchart_core::{geometry::Point, identifier::Id};

use crate::{
    config::InteractionConfig,
    drop::{DropMode, DropPlanner},
    error::OrgChartError,
    hit::{find_detached_at, find_leaf_at, find_unit_at},
    layout::ChartLayout,
    records::{ChartRecords, EditSet},
    viewport::Viewport,
};

/// Something the pointer can pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Unit(Id),
    Leaf(Id),
}

impl EntityRef {
    pub fn id(&self) -> Id {
        match self {
            Self::Unit(id) | Self::Leaf(id) => *id,
        }
    }
}

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pressed on `entity` at screen position `origin`; not moved far enough
    /// to count as a drag yet.
    Candidate { entity: EntityRef, origin: Point },
    Dragging { entity: EntityRef },
}

/// Where the dragged entity would land if released now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverClassification {
    /// Not dragging, or nothing under the pointer.
    Nothing,
    /// A unit over a unit. `allowed` is `false` when the drop would be
    /// rejected as a move into the unit's own subtree.
    Unit {
        target: Id,
        mode: DropMode,
        allowed: bool,
    },
    /// A contact over a unit box.
    LeafOnUnit { target: Id },
    /// A contact over another contact's slot.
    LeafOnLeaf { target: Id, mode: DropMode },
}

impl HoverClassification {
    /// Drop-mode indicator to draw: right-edge bar for `Parent`, top bar for
    /// `Before`, bottom bar for `After`.
    pub fn indicator(&self) -> Option<DropMode> {
        match self {
            Self::Unit {
                mode,
                allowed: true,
                ..
            }
            | Self::LeafOnLeaf { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    /// Id of the hovered target, if any.
    pub fn target(&self) -> Option<Id> {
        match self {
            Self::Nothing => None,
            Self::Unit { target, .. }
            | Self::LeafOnUnit { target }
            | Self::LeafOnLeaf { target, .. } => Some(*target),
        }
    }
}

/// Outcome of a release or leave.
#[derive(Debug)]
pub enum DragEvent {
    /// Press and release without crossing the drag threshold.
    Select(EntityRef),
    /// An accepted drop; apply the edits to the records.
    Drop(EditSet),
    /// A drop that was refused. Records stay untouched.
    Rejected(OrgChartError),
    /// The gesture was abandoned by leaving the surface.
    Cancelled,
    /// Nothing happened: no gesture in progress, released over empty space,
    /// or a drop that changes nothing.
    Ignored,
}

/// The state a session hit-tests against: one records snapshot, the layout
/// computed from it, and the current viewport.
#[derive(Debug, Clone, Copy)]
pub struct DragContext<'a> {
    records: &'a ChartRecords,
    layout: &'a ChartLayout,
    viewport: &'a Viewport,
}

impl<'a> DragContext<'a> {
    pub fn new(
        records: &'a ChartRecords,
        layout: &'a ChartLayout,
        viewport: &'a Viewport,
    ) -> Self {
        Self {
            records,
            layout,
            viewport,
        }
    }
}

/// Drag-and-drop state machine for one pointer.
#[derive(Debug, Clone)]
pub struct DragSession {
    state: DragState,
    config: InteractionConfig,
}

impl DragSession {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            state: DragState::Idle,
            config,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Entity being pressed or dragged.
    pub fn active_entity(&self) -> Option<EntityRef> {
        match self.state {
            DragState::Idle => None,
            DragState::Candidate { entity, .. } | DragState::Dragging { entity } => Some(entity),
        }
    }

    /// Starts a gesture on the entity under `screen`.
    ///
    /// Ignored while another gesture is in progress. Contacts are picked
    /// before the unit box holding them; detached units can be picked up too.
    pub fn pointer_down(&mut self, ctx: &DragContext<'_>, screen: Point) -> Option<EntityRef> {
        if self.state != DragState::Idle {
            debug!(state:? = self.state; "Pointer down ignored, gesture in progress");
            return None;
        }

        let point = ctx.viewport.screen_to_diagram(screen);
        let entity = ctx
            .layout
            .root()
            .and_then(|root| {
                find_leaf_at(root, point)
                    .map(|hit| EntityRef::Leaf(hit.leaf()))
                    .or_else(|| find_unit_at(root, point, 0.0).map(EntityRef::Unit))
            })
            .or_else(|| find_detached_at(ctx.layout.detached(), point).map(EntityRef::Unit))?;

        trace!(entity:? = entity; "Drag candidate");
        self.state = DragState::Candidate {
            entity,
            origin: screen,
        };
        Some(entity)
    }

    /// Tracks pointer movement and classifies the hovered drop target.
    pub fn pointer_move(&mut self, ctx: &DragContext<'_>, screen: Point) -> HoverClassification {
        if let DragState::Candidate { entity, origin } = self.state {
            if origin.distance(screen) > self.config.drag_threshold() {
                debug!(entity:? = entity; "Drag started");
                self.state = DragState::Dragging { entity };
            }
        }

        match self.state {
            DragState::Dragging { entity } => self.classify_hover(ctx, entity, screen),
            _ => HoverClassification::Nothing,
        }
    }

    /// Ends the gesture. Always leaves the session idle.
    pub fn pointer_up(&mut self, ctx: &DragContext<'_>, screen: Point) -> DragEvent {
        let entity = match mem::take(&mut self.state) {
            DragState::Idle => return DragEvent::Ignored,
            DragState::Candidate { entity, origin }
                if origin.distance(screen) <= self.config.drag_threshold() =>
            {
                info!(entity:? = entity; "Entity selected");
                return DragEvent::Select(entity);
            }
            DragState::Candidate { entity, .. } | DragState::Dragging { entity } => entity,
        };

        let planner = DropPlanner::new(ctx.records, ctx.layout, &self.config);
        let point = ctx.viewport.screen_to_diagram(screen);
        let Some(result) = self.plan_drop(ctx, &planner, entity, point) else {
            debug!(entity:? = entity; "Released over empty space");
            return DragEvent::Ignored;
        };

        match result {
            Ok(edits) if edits.is_empty() => DragEvent::Ignored,
            Ok(edits) => DragEvent::Drop(edits),
            Err(err) => {
                info!(entity:? = entity, err:%; "Drop rejected");
                DragEvent::Rejected(err)
            }
        }
    }

    /// Abandons the gesture without touching any record.
    pub fn pointer_leave(&mut self) -> DragEvent {
        match mem::take(&mut self.state) {
            DragState::Idle => DragEvent::Ignored,
            state => {
                debug!(state:? = state; "Drag cancelled");
                DragEvent::Cancelled
            }
        }
    }

    fn classify_hover(
        &self,
        ctx: &DragContext<'_>,
        entity: EntityRef,
        screen: Point,
    ) -> HoverClassification {
        let Some(root) = ctx.layout.root() else {
            return HoverClassification::Nothing;
        };
        let point = ctx.viewport.screen_to_diagram(screen);
        let planner = DropPlanner::new(ctx.records, ctx.layout, &self.config);

        match entity {
            EntityRef::Unit(dragged) => {
                let Some(target) = find_unit_at(root, point, self.config.hit_margin()) else {
                    return HoverClassification::Nothing;
                };
                if target == dragged {
                    return HoverClassification::Nothing;
                }
                match planner.classify(target, point) {
                    Some(mode) => HoverClassification::Unit {
                        target,
                        mode,
                        allowed: !planner.would_create_cycle(dragged, target),
                    },
                    None => HoverClassification::Nothing,
                }
            }
            EntityRef::Leaf(dragged) => {
                if let Some(hit) = find_leaf_at(root, point).filter(|hit| hit.leaf() != dragged) {
                    return HoverClassification::LeafOnLeaf {
                        target: hit.leaf(),
                        mode: DropMode::for_leaf(&hit, point),
                    };
                }
                find_unit_at(root, point, self.config.hit_margin())
                    .map_or(HoverClassification::Nothing, |target| {
                        HoverClassification::LeafOnUnit { target }
                    })
            }
        }
    }

    /// `None` when nothing is under the pointer.
    fn plan_drop(
        &self,
        ctx: &DragContext<'_>,
        planner: &DropPlanner<'_>,
        entity: EntityRef,
        point: Point,
    ) -> Option<Result<EditSet, OrgChartError>> {
        let root = ctx.layout.root()?;
        match entity {
            EntityRef::Unit(dragged) => {
                let target = find_unit_at(root, point, self.config.hit_margin())?;
                Some(planner.plan_unit_drop(dragged, target, point))
            }
            EntityRef::Leaf(dragged) => {
                if let Some(hit) = find_leaf_at(root, point).filter(|hit| hit.leaf() != dragged) {
                    let mode = DropMode::for_leaf(&hit, point);
                    return Some(planner.plan_leaf_drop_on_leaf(dragged, hit.leaf(), mode));
                }
                let target = find_unit_at(root, point, self.config.hit_margin())?;
                Some(planner.plan_leaf_drop(dragged, target))
            }
        }
    }
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
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
        layout::LayoutEngine,
    };

    fn unit(id: &str, placement: Placement) -> OrgUnit {
        OrgUnit::new(Id::new(id), Id::new("acme"), id, placement)
    }

    /// A(0,0) with children B(160,0), C(160,70) and D under C at (320,70).
    /// B holds contact L; N is detached at (0,200).
    fn fixture() -> (ChartRecords, ChartLayout) {
        let records = ChartRecords::new(
            vec![
                unit("A", Placement::root(10.0)),
                unit("B", Placement::child_of(Id::new("A"), 10.0)),
                unit("C", Placement::child_of(Id::new("A"), 20.0)),
                unit("D", Placement::child_of(Id::new("C"), 10.0)),
                unit("N", Placement::Unplaced),
            ],
            vec![LeafItem::new(Id::new("L"), Id::new("B"), "Ito", "Ken", 1)],
        );
        let config = LayoutConfig::default().with_text_measure(TextMeasureKind::Estimate);
        let layout = LayoutEngine::new(config, LevelPalette::default(), Color::default())
            .layout(&records);
        (records, layout)
    }

    #[test]
    fn test_click_selects() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        assert_eq!(
            session.pointer_down(&ctx, Point::new(20.0, 20.0)),
            Some(EntityRef::Unit(Id::new("A")))
        );
        assert_eq!(
            session.pointer_move(&ctx, Point::new(23.0, 23.0)),
            HoverClassification::Nothing
        );
        assert!(matches!(session.state(), DragState::Candidate { .. }));

        let event = session.pointer_up(&ctx, Point::new(23.0, 23.0));
        assert!(matches!(event, DragEvent::Select(EntityRef::Unit(id)) if id == Id::new("A")));
        assert_eq!(session.state(), DragState::Idle);
    }

    #[test]
    fn test_contact_is_picked_before_its_unit() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        // B's contact row starts at (185, 40).
        assert_eq!(
            session.pointer_down(&ctx, Point::new(190.0, 50.0)),
            Some(EntityRef::Leaf(Id::new("L")))
        );
    }

    #[test]
    fn test_second_press_is_ignored() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        session.pointer_down(&ctx, Point::new(20.0, 20.0));
        assert_eq!(session.pointer_down(&ctx, Point::new(200.0, 100.0)), None);
        assert_eq!(session.active_entity(), Some(EntityRef::Unit(Id::new("A"))));
    }

    #[test]
    fn test_press_on_empty_space() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        assert_eq!(session.pointer_down(&ctx, Point::new(900.0, 900.0)), None);
        assert!(matches!(session.pointer_up(&ctx, Point::new(900.0, 900.0)), DragEvent::Ignored));
    }

    #[test]
    fn test_drag_unit_before_sibling() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        session.pointer_down(&ctx, Point::new(200.0, 90.0));
        let hover = session.pointer_move(&ctx, Point::new(220.0, 10.0));
        assert_eq!(
            hover,
            HoverClassification::Unit {
                target: Id::new("B"),
                mode: DropMode::Before,
                allowed: true,
            }
        );
        assert_eq!(hover.indicator(), Some(DropMode::Before));

        let DragEvent::Drop(edits) = session.pointer_up(&ctx, Point::new(220.0, 10.0)) else {
            panic!("expected a drop");
        };
        assert_eq!(
            edits.unit(Id::new("C")).unwrap().placement(),
            Placement::child_of(Id::new("A"), 9.0)
        );
        assert_eq!(session.state(), DragState::Idle);
    }

    #[test]
    fn test_drag_into_own_subtree_is_rejected() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        session.pointer_down(&ctx, Point::new(200.0, 90.0));
        let hover = session.pointer_move(&ctx, Point::new(460.0, 80.0));
        assert_eq!(hover.target(), Some(Id::new("D")));
        assert_eq!(hover.indicator(), None);

        let event = session.pointer_up(&ctx, Point::new(460.0, 80.0));
        assert!(matches!(event, DragEvent::Rejected(err) if err.is_invalid_move()));
        assert_eq!(session.state(), DragState::Idle);
    }

    #[test]
    fn test_drag_released_over_nothing() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        session.pointer_down(&ctx, Point::new(200.0, 90.0));
        session.pointer_move(&ctx, Point::new(800.0, 600.0));
        assert!(matches!(
            session.pointer_up(&ctx, Point::new(800.0, 600.0)),
            DragEvent::Ignored
        ));
    }

    #[test]
    fn test_leave_cancels() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        session.pointer_down(&ctx, Point::new(200.0, 90.0));
        session.pointer_move(&ctx, Point::new(200.0, 10.0));
        assert!(matches!(session.pointer_leave(), DragEvent::Cancelled));
        assert_eq!(session.state(), DragState::Idle);
        assert!(matches!(session.pointer_leave(), DragEvent::Ignored));
    }

    #[test]
    fn test_drag_contact_to_unit() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        session.pointer_down(&ctx, Point::new(190.0, 50.0));
        let hover = session.pointer_move(&ctx, Point::new(400.0, 90.0));
        assert_eq!(
            hover,
            HoverClassification::LeafOnUnit {
                target: Id::new("D")
            }
        );

        let DragEvent::Drop(edits) = session.pointer_up(&ctx, Point::new(400.0, 90.0)) else {
            panic!("expected a drop");
        };
        assert_eq!(edits.len(), 1);
        assert_eq!(edits.leaf(Id::new("L")).unwrap().unit(), Id::new("D"));
    }

    #[test]
    fn test_detached_unit_dropped_as_child() {
        let (records, layout) = fixture();
        let viewport = Viewport::default();
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        assert_eq!(
            session.pointer_down(&ctx, Point::new(50.0, 220.0)),
            Some(EntityRef::Unit(Id::new("N")))
        );
        session.pointer_move(&ctx, Point::new(300.0, 30.0));
        let DragEvent::Drop(edits) = session.pointer_up(&ctx, Point::new(300.0, 30.0)) else {
            panic!("expected a drop");
        };
        assert_eq!(
            edits.unit(Id::new("N")).unwrap().placement(),
            Placement::child_of(Id::new("B"), 10.0)
        );
    }

    #[test]
    fn test_points_go_through_viewport() {
        let (records, layout) = fixture();
        let mut viewport = Viewport::default();
        viewport.pan_by(Point::new(100.0, 100.0));
        viewport.set_scale(2.0);
        let ctx = DragContext::new(&records, &layout, &viewport);
        let mut session = DragSession::default();

        // Screen (140, 140) is chart (20, 20), inside A.
        assert_eq!(
            session.pointer_down(&ctx, Point::new(140.0, 140.0)),
            Some(EntityRef::Unit(Id::new("A")))
        );
    }
}
