//! Reference output: effective mappings and investment actions

use std::path::Path;

use anyhow::Result;
use csv2qif_core::InvestmentAction;

use super::core::{parse_tx_type, resolve_mapping};

pub fn cmd_mapping(
    config_path: Option<&Path>,
    tx_type: &str,
    mapping_arg: Option<&str>,
) -> Result<()> {
    let tx_type = parse_tx_type(tx_type)?;
    let mapping = resolve_mapping(config_path, tx_type, mapping_arg)?;
    println!("{}", serde_json::to_string_pretty(&mapping)?);
    Ok(())
}

pub fn cmd_actions() -> Result<()> {
    println!("📋 Investment actions:");
    println!();
    for line in action_lines() {
        println!("  {}", line);
    }
    Ok(())
}

/// One line per action: name, then the fields relevant to it besides the
/// common date/action/security/memo ones
pub fn action_lines() -> Vec<String> {
    InvestmentAction::all()
        .iter()
        .map(|action| {
            let fields: Vec<&str> = action.fields().iter().map(|f| f.as_str()).collect();
            format!("{:<10} {}", action.as_str(), fields.join(", "))
        })
        .collect()
}
