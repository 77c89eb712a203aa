//! Error types for chart operations.
//!
//! Every error is local and recoverable: a rejected edit leaves the records
//! untouched and the drag session back in its idle state.

use std::io;

use thiserror::Error;

use orgchart_core::identifier::Id;

/// The main error type for chart operations.
#[derive(Debug, Error)]
pub enum OrgChartError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Records error: {0}")]
    Records(String),

    /// Moving `dragged` relative to `target` would make a unit its own ancestor.
    #[error("Invalid move: cannot place `{dragged}` relative to its own descendant `{target}`")]
    InvalidMove { dragged: Id, target: Id },

    #[error("Unknown unit `{0}`")]
    UnknownUnit(Id),

    #[error("Unknown leaf item `{0}`")]
    UnknownLeaf(Id),

    /// The unit exists but is not part of the laid-out hierarchy.
    #[error("Unit `{0}` is not placed in the chart")]
    NotPlaced(Id),
}

impl OrgChartError {
    /// Returns `true` for rejections the user should see as "invalid move".
    pub fn is_invalid_move(&self) -> bool {
        matches!(self, Self::InvalidMove { .. })
    }
}
