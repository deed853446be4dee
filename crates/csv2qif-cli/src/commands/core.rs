//! Shared utilities for commands
//!
//! - `parse_tx_type` - Parse the `--type` argument
//! - `resolve_mapping` - Defaults, override file and `--mapping` merged together

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv2qif_core::{FieldMapping, MappingConfig, TransactionType};
use tracing::debug;

pub fn parse_tx_type(s: &str) -> Result<TransactionType> {
    s.parse::<TransactionType>().map_err(|e| anyhow!(e))
}

/// Effective mapping for `tx_type`: embedded defaults, then the config file,
/// then the `--mapping` argument
pub fn resolve_mapping(
    config_path: Option<&Path>,
    tx_type: TransactionType,
    mapping_arg: Option<&str>,
) -> Result<FieldMapping> {
    let config = MappingConfig::load(config_path).context("Failed to load mapping config")?;
    let mut mapping = config.default_for(tx_type).clone();

    if let Some(arg) = mapping_arg {
        let overrides =
            FieldMapping::from_json_arg(arg).context("Failed to parse --mapping argument")?;
        debug!("Applying {} mapping override(s)", overrides.len());
        mapping.merge(&overrides);
    }

    mapping.validate(tx_type)?;
    Ok(mapping)
}
