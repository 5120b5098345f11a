//! CLI module graph.

pub mod check;
pub mod command;
pub mod output;
pub mod scan;

use owo_colors::set_override;
use std::io::IsTerminal;

use crate::error::Result;
use command::{Cli, ColorChoice, Commands};

/// Apply global flags and dispatch the subcommand.
///
/// # Errors
///
/// Returns the subcommand's error; the binary maps it to a non-zero exit.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));
    match cli.color {
        ColorChoice::Always => set_override(true),
        ColorChoice::Never => set_override(false),
        ColorChoice::Auto => set_override(std::io::stdout().is_terminal()),
    }

    match cli.command {
        Commands::Scan(args) => scan::execute(&args).await,
        Commands::Check(args) => check::execute(&args.config),
    }
}
