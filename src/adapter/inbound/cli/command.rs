//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Prediction market arbitrage detection and trade sizing
#[derive(Parser, Debug)]
#[command(name = "arbscan")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a snapshot file for arbitrage
    Scan(ScanArgs),

    /// Validate a configuration file
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Snapshot document (JSON)
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Configuration file (TOML); defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report at most this many opportunities
    #[arg(long)]
    pub limit: Option<usize>,

    /// Skip Layer 3 trade sizing
    #[arg(long)]
    pub no_refine: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Configuration file (TOML)
    #[arg(long)]
    pub config: PathBuf,
}
