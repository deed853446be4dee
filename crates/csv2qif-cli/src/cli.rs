//! CLI argument definitions using clap
//!
//! Argument structs only; the command implementations are in `commands`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// csv2qif - Convert CSV transaction exports to QIF
#[derive(Parser)]
#[command(name = "csv2qif")]
#[command(about = "Convert CSV bank and brokerage exports to QIF", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Mapping override file (TOML with [cash] / [investment] tables)
    ///
    /// When omitted, ~/.config/csv2qif/mappings.toml is used if it exists.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a CSV file to QIF
    Convert {
        /// CSV file to read
        input: PathBuf,

        /// QIF file to write (appended to unless --overwrite)
        output: PathBuf,

        /// Transaction type: cash or investment
        #[arg(short = 't', long = "type", value_parser = ["cash", "bank", "investment", "invst"])]
        tx_type: String,

        /// Field mapping overrides as inline JSON or a path to a JSON file
        ///
        /// Example: '{"date": "Posted", "amount": "Value"}'
        #[arg(short, long)]
        mapping: Option<String>,

        /// Replace the output file instead of appending to it
        #[arg(long)]
        overwrite: bool,

        /// Exit with an error if any row was skipped
        #[arg(long)]
        strict: bool,
    },

    /// Show the effective field mapping for a transaction type
    Mapping {
        /// Transaction type: cash or investment
        #[arg(short = 't', long = "type", value_parser = ["cash", "bank", "investment", "invst"])]
        tx_type: String,

        /// Field mapping overrides as inline JSON or a path to a JSON file
        #[arg(short, long)]
        mapping: Option<String>,
    },

    /// List investment actions and the fields relevant to each
    Actions,
}
