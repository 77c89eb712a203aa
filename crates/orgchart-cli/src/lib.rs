//! CLI logic for the orgchart tool.
//!
//! Each subcommand loads a TOML records file, optionally restricts it to one
//! owner with `--owner`, runs one engine operation and writes TOML: the
//! layout for `layout`, the full updated records for the editing commands.

pub mod error_adapter;

mod args;
mod config;

pub use args::{AddArgs, Args, Command, DeleteArgs, LayoutArgs, ModeArg, MoveArgs, MovedEntity};

use std::{
    fs,
    io::{self, Write},
};

use log::info;
use serde::Serialize;

use orgchart::{
    ChartEngine, OrgChartError, drop::DropMode, identifier::Id, records::ChartRecords,
};

/// Run the orgchart CLI application
///
/// # Errors
///
/// Returns `OrgChartError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed records files
/// - Rejected edits (moves into a unit's own subtree, unknown ids)
pub fn run(args: &Args) -> Result<(), OrgChartError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let engine = ChartEngine::new(app_config)?;
    let owner = args.owner.as_deref().map(Id::new);

    match &args.command {
        Command::Layout(cmd) => {
            let records = scoped(load_records(&cmd.input)?, owner);
            let layout = engine.layout(&records);
            write_toml(&layout, cmd.output.as_deref())?;
        }
        Command::Move(cmd) => {
            let records = load_records(&cmd.input)?;
            let updated = move_entity(&engine, &records, owner, cmd)?;
            write_toml(&updated, cmd.output.as_deref())?;
        }
        Command::Add(cmd) => {
            let owner = owner.ok_or_else(|| {
                OrgChartError::Records("`add` needs --owner for the new unit".to_string())
            })?;
            let records = load_records(&cmd.input)?;
            let updated = records.with_new_unit(Id::new(&cmd.id), owner, &cmd.name)?;
            info!(unit = cmd.id, owner:% = owner; "Unit added");
            write_toml(&updated, cmd.output.as_deref())?;
        }
        Command::Delete(cmd) => {
            let records = load_records(&cmd.input)?;
            let updated = records.without_unit(Id::new(&cmd.id))?;
            info!(unit = cmd.id; "Unit deleted");
            write_toml(&updated, cmd.output.as_deref())?;
        }
    }

    Ok(())
}

/// Plans the move on the scoped records and applies it to all of them.
fn move_entity(
    engine: &ChartEngine,
    records: &ChartRecords,
    owner: Option<Id>,
    cmd: &MoveArgs,
) -> Result<ChartRecords, OrgChartError> {
    let scope = scoped(records.clone(), owner);
    let layout = engine.layout(&scope);
    let planner = engine.planner(&scope, &layout);
    let target = Id::new(&cmd.target);
    let mode = DropMode::from(cmd.mode);

    let edits = match (&cmd.entity.unit, &cmd.entity.leaf) {
        (Some(unit), _) => planner.plan_unit_drop_with_mode(Id::new(unit), target, mode)?,
        (None, Some(leaf)) if mode == DropMode::Parent => {
            planner.plan_leaf_drop(Id::new(leaf), target)?
        }
        (None, Some(leaf)) => planner.plan_leaf_drop_on_leaf(Id::new(leaf), target, mode)?,
        (None, None) => {
            return Err(OrgChartError::Records(
                "`move` needs --unit or --leaf".to_string(),
            ));
        }
    };

    if edits.is_empty() {
        info!(target:% = target; "Nothing to move");
    } else {
        info!(edits = edits.len(), target:% = target, mode:%; "Move applied");
    }
    Ok(records.apply(&edits))
}

fn scoped(records: ChartRecords, owner: Option<Id>) -> ChartRecords {
    match owner {
        Some(owner) => records.for_owner(owner),
        None => records,
    }
}

fn load_records(path: &str) -> Result<ChartRecords, OrgChartError> {
    info!(input_path = path; "Loading records");
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|err| OrgChartError::Records(format!("Failed to parse `{path}`: {err}")))
}

/// Writes `value` as TOML to `output`, or to stdout.
fn write_toml<T: Serialize>(value: &T, output: Option<&str>) -> Result<(), OrgChartError> {
    let text = toml::to_string(value)
        .map_err(|err| OrgChartError::Records(format!("Failed to serialize output: {err}")))?;

    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!(output_file = path; "Output written");
        }
        None => io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}
