//! csv2qif CLI - CSV to QIF converter
//!
//! Usage:
//!   csv2qif convert in.csv out.qif --type cash        Convert a bank export
//!   csv2qif convert in.csv out.qif --type investment  Convert a brokerage export
//!   csv2qif mapping --type investment                 Show the effective mapping
//!   csv2qif actions                                   List investment actions

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            tx_type,
            mapping,
            overwrite,
            strict,
        } => commands::cmd_convert(
            cli.config.as_deref(),
            &input,
            &output,
            &tx_type,
            mapping.as_deref(),
            overwrite,
            strict,
        ),
        Commands::Mapping { tx_type, mapping } => {
            commands::cmd_mapping(cli.config.as_deref(), &tx_type, mapping.as_deref())
        }
        Commands::Actions => commands::cmd_actions(),
    }
}
