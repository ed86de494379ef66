//! CLI argument definitions for the Arbor binary.

use std::path::PathBuf;

use arbor::tree::Expansion;
use clap::{Parser, Subcommand, ValueEnum};

/// How far walks descend
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    /// Descend into everything, including nodes below the start (default)
    Unrestricted,
    /// Stop at nodes: visit them but not their fields
    NodeBoundary,
}

impl From<Mode> for Expansion {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Unrestricted => Expansion::Unrestricted,
            Mode::NodeBoundary => Expansion::NodeBoundary,
        }
    }
}

/// Path addressing and node linkage for heterogeneous trees
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(about = "Arbor: walk and address positions in nested documents")]
#[command(version)]
pub struct Cli {
    /// Emit JSON instead of tables
    #[arg(long, global = true, env = "ARBOR_JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every position of a JSON document in pre-order
    Walk(WalkArgs),
    /// Print the value at a dotted path
    Get(GetArgs),
    /// Build a small expression tree and show its linkage before and after edits
    Demo,
}

/// Arguments for the walk command
#[derive(clap::Args, Debug)]
pub struct WalkArgs {
    /// JSON document to read, or `-` for stdin
    pub input: PathBuf,

    /// Dotted path to start from (defaults to the document root)
    #[arg(short, long)]
    pub from: Option<String>,

    /// Step backwards with decrement instead of forwards
    #[arg(short, long)]
    pub back: bool,

    /// Stop after this many positions
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Expansion mode for descent
    #[arg(short, long, default_value = "unrestricted", env = "ARBOR_MODE")]
    pub mode: Mode,
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// JSON document to read, or `-` for stdin
    pub input: PathBuf,

    /// Dotted path such as `items.0.name`; empty for the root
    #[arg(default_value = "")]
    pub path: String,
}
