//! Convert command

use std::path::Path;

use anyhow::{bail, Context, Result};
use csv2qif_core::{Converter, WriteMode};

use super::core::{parse_tx_type, resolve_mapping};

pub fn cmd_convert(
    config_path: Option<&Path>,
    input: &Path,
    output: &Path,
    tx_type: &str,
    mapping_arg: Option<&str>,
    overwrite: bool,
    strict: bool,
) -> Result<()> {
    let tx_type = parse_tx_type(tx_type)?;
    let mapping = resolve_mapping(config_path, tx_type, mapping_arg)?;

    // Catch a wrong mapping before anything is written
    let headers = read_headers(input)?;
    mapping.validate_headers(&headers)?;

    println!(
        "📥 Converting {} ({}) to {}...",
        input.display(),
        tx_type,
        output.display()
    );

    let mode = if overwrite {
        WriteMode::Truncate
    } else {
        WriteMode::Append
    };
    let converter = Converter::new(tx_type, mapping)?;
    let report = converter
        .convert_file(input, output, mode)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    println!("✅ Conversion complete!");
    println!("   Written: {}", report.records_written);
    println!("   Skipped: {}", report.skipped.len());
    for row in &report.skipped {
        println!("   ⚠️  {}", row);
    }

    if strict && !report.skipped.is_empty() {
        bail!(
            "{} row(s) could not be converted (--strict)",
            report.skipped.len()
        );
    }

    Ok(())
}

fn read_headers(input: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header from {}", input.display()))?;
    Ok(headers.iter().map(str::to_string).collect())
}
