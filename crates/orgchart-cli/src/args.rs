//! Command-line argument definitions for the orgchart CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Each subcommand reads a TOML records file, runs one engine
//! operation and writes the result as TOML, to `--output` or to stdout.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use orgchart::drop::DropMode;

/// Command-line arguments for the orgchart tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Restrict the chart to units of this owner; also the owner of units
    /// created by `add`
    #[arg(long, global = true)]
    pub owner: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lay out the chart and write the positioned boxes
    Layout(LayoutArgs),
    /// Move a unit or a contact and write the updated records
    Move(MoveArgs),
    /// Create a unit and write the updated records
    Add(AddArgs),
    /// Delete a unit and write the updated records
    Delete(DeleteArgs),
}

#[derive(ClapArgs, Debug)]
pub struct LayoutArgs {
    /// Path to the records file
    pub input: String,

    /// Path to the output TOML file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct MoveArgs {
    /// Path to the records file
    pub input: String,

    #[command(flatten)]
    pub entity: MovedEntity,

    /// Drop target: a unit id, or a contact id for a contact moved
    /// `before`/`after` another contact
    #[arg(long)]
    pub target: String,

    #[arg(long, value_enum, default_value_t = ModeArg::Parent)]
    pub mode: ModeArg,

    /// Path to the output TOML file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// What is being moved: exactly one of `--unit` and `--leaf`.
#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
pub struct MovedEntity {
    /// Id of the unit to move
    #[arg(long)]
    pub unit: Option<String>,

    /// Id of the contact to move
    #[arg(long)]
    pub leaf: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct AddArgs {
    /// Path to the records file
    pub input: String,

    #[arg(long)]
    pub id: String,

    #[arg(long)]
    pub name: String,

    /// Path to the output TOML file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct DeleteArgs {
    /// Path to the records file
    pub input: String,

    #[arg(long)]
    pub id: String,

    /// Path to the output TOML file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Drop mode as typed on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Parent,
    Before,
    After,
}

impl From<ModeArg> for DropMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Parent => DropMode::Parent,
            ModeArg::Before => DropMode::Before,
            ModeArg::After => DropMode::After,
        }
    }
}
