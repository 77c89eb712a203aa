//! Error adapter for converting OrgChartError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI. Every variant
//! gets a stable diagnostic code; rejected edits also carry a hint.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use orgchart::OrgChartError;

/// Adapter rendering an [`OrgChartError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a OrgChartError);

impl ErrorAdapter<'_> {
    fn code_str(&self) -> &'static str {
        match self.0 {
            OrgChartError::Io(_) => "orgchart::io",
            OrgChartError::Config(_) => "orgchart::config",
            OrgChartError::Records(_) => "orgchart::records",
            OrgChartError::InvalidMove { .. } => "orgchart::invalid_move",
            OrgChartError::UnknownUnit(_) => "orgchart::unknown_unit",
            OrgChartError::UnknownLeaf(_) => "orgchart::unknown_leaf",
            OrgChartError::NotPlaced(_) => "orgchart::not_placed",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        match self.0 {
            OrgChartError::InvalidMove { .. } => {
                Some("a unit can only move next to or under units outside its own subtree")
            }
            OrgChartError::NotPlaced(_) => {
                Some("move the target into the chart first; unplaced units cannot receive drops")
            }
            OrgChartError::UnknownUnit(_) | OrgChartError::UnknownLeaf(_) => {
                Some("check the id against the records file and the --owner filter")
            }
            _ => None,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_str()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wraps `err` for rendering with a miette report handler.
pub fn to_reportable(err: &OrgChartError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use orgchart::identifier::Id;

    use super::*;

    #[test]
    fn test_invalid_move_has_code_and_help() {
        let err = OrgChartError::InvalidMove {
            dragged: Id::new("A"),
            target: Id::new("D"),
        };
        let reportable = to_reportable(&err);

        assert_eq!(
            reportable.code().unwrap().to_string(),
            "orgchart::invalid_move"
        );
        assert!(reportable.help().is_some());
        assert_eq!(reportable.to_string(), err.to_string());
    }

    #[test]
    fn test_config_error_has_no_help() {
        let err = OrgChartError::Config("bad color".to_string());
        let reportable = to_reportable(&err);

        assert_eq!(reportable.code().unwrap().to_string(), "orgchart::config");
        assert!(reportable.help().is_none());
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = OrgChartError::UnknownUnit(Id::new("ghost"));
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &to_reportable(&err))
            .unwrap();

        assert!(out.contains("orgchart::unknown_unit"));
        assert!(out.contains("ghost"));
    }
}
