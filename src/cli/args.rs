//! Command line arguments for scene-validator.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::severity::Severity;

/// Validate scene documents against declarative marker rules.
#[derive(Parser, Debug, Clone)]
#[command(name = "scene-validator", about, disable_version_flag = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode (only failures)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (every result and debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Command to execute
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate a scene document
    Check(CheckArgs),
    /// List the built-in rules
    Rules,
    /// Print version information
    Version,
}

/// Arguments for `check`.
#[derive(ClapArgs, Debug, Clone, PartialEq, Default)]
pub struct CheckArgs {
    /// Scene document (JSON)
    pub scene: PathBuf,

    /// Lowest severity to report (info, warning, error)
    #[arg(long, value_name = "SEVERITY")]
    pub min_severity: Option<Severity>,

    /// Run validators on worker threads
    #[arg(long)]
    pub parallel: bool,

    /// Worker threads when running in parallel
    #[arg(long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Type to exclude from discovery (repeatable)
    #[arg(long = "ignore-type", value_name = "TYPE")]
    pub ignore_types: Vec<String>,

    /// Marker kind whose carriers are excluded from discovery (repeatable)
    #[arg(long = "ignore-marker", value_name = "MARKER")]
    pub ignore_markers: Vec<String>,
}
