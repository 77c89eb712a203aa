//! Orgchart - tree build, layout and drag-and-drop editing for organization charts.
//!
//! The engine consumes flat unit and contact records and emits structural
//! edits as replacement records. It never paints and never persists:
//!
//! 1. [`tree::build_tree`] turns records into an ordered tree.
//! 2. [`layout::LayoutEngine`] positions every unit box and contact slot.
//! 3. [`hit`] and [`relation`] answer pointer and ancestry queries.
//! 4. [`interaction::DragSession`] tracks a gesture and, on release, asks
//!    [`drop::DropPlanner`] for the edits, renumbering siblings through
//!    [`renumber::OrderRenumberer`] when needed.
//!
//! [`ChartEngine`] wires these together from one [`config::AppConfig`].

pub mod config;
pub mod drop;
pub mod hit;
pub mod interaction;
pub mod layout;
pub mod records;
pub mod relation;
pub mod renumber;
pub mod tree;
pub mod viewport;

mod error;

pub use orgchart_core::{color, geometry, identifier, record, text};

pub use error::OrgChartError;

use log::{debug, info};

use config::AppConfig;
use drop::DropPlanner;
use interaction::DragSession;
use layout::{ChartLayout, LayoutEngine};
use records::ChartRecords;
use viewport::Viewport;

/// Entry point for laying out and editing a chart.
///
/// # Examples
///
/// ```
/// use orgchart::{
///     ChartEngine,
///     config::{AppConfig, LayoutConfig, TextMeasureKind},
///     drop::DropMode,
///     identifier::Id,
///     record::{OrgUnit, Placement},
///     records::ChartRecords,
/// };
///
/// let layout_config = LayoutConfig::default().with_text_measure(TextMeasureKind::Estimate);
/// let engine = ChartEngine::new(AppConfig::default().with_layout(layout_config))
///     .expect("default colors are valid");
///
/// let acme = Id::new("acme");
/// let records = ChartRecords::new(
///     vec![
///         OrgUnit::new(Id::new("hq"), acme, "HQ", Placement::root(10.0)),
///         OrgUnit::new(Id::new("sales"), acme, "Sales", Placement::child_of(Id::new("hq"), 10.0)),
///         OrgUnit::new(Id::new("ops"), acme, "Ops", Placement::child_of(Id::new("hq"), 20.0)),
///     ],
///     vec![],
/// );
///
/// let layout = engine.layout(&records);
/// let edits = engine
///     .planner(&records, &layout)
///     .plan_unit_drop_with_mode(Id::new("ops"), Id::new("sales"), DropMode::Before)
///     .expect("valid move");
///
/// let records = records.apply(&edits);
/// assert_eq!(records.unit(Id::new("ops")).unwrap().order(), Some(9.0));
/// ```
#[derive(Debug, Clone)]
pub struct ChartEngine {
    config: AppConfig,
    layout_engine: LayoutEngine,
}

impl ChartEngine {
    /// Creates an engine from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`OrgChartError::Config`] if a configured color cannot be
    /// parsed or a numeric limit is out of range.
    pub fn new(config: AppConfig) -> Result<Self, OrgChartError> {
        config.validate().map_err(OrgChartError::Config)?;
        let palette = config.style().palette().map_err(OrgChartError::Config)?;
        let detached_color = config
            .style()
            .detached_color()
            .map_err(OrgChartError::Config)?;
        let layout_engine = LayoutEngine::new(config.layout().clone(), palette, detached_color);

        debug!(text_measure:? = config.layout().text_measure(); "Chart engine created");
        Ok(Self {
            config,
            layout_engine,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Lays out the records. Call again after every applied edit set.
    pub fn layout(&self, records: &ChartRecords) -> ChartLayout {
        info!(
            units = records.units().len(),
            leaves = records.leaves().len();
            "Laying out chart"
        );
        self.layout_engine.layout(records)
    }

    /// A drop planner over `records` and the `layout` computed from them.
    pub fn planner<'a>(
        &'a self,
        records: &'a ChartRecords,
        layout: &'a ChartLayout,
    ) -> DropPlanner<'a> {
        DropPlanner::new(records, layout, self.config.interaction())
    }

    /// A fresh, idle drag session.
    pub fn session(&self) -> DragSession {
        DragSession::new(self.config.interaction().clone())
    }

    /// An identity viewport with the configured zoom limits.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.viewport())
    }
}
