//! Default field mappings per transaction type
//!
//! ## Configuration Resolution
//!
//! Mappings are resolved in two layers:
//! 1. Embedded defaults (compiled into the binary from `config/mappings.toml`)
//! 2. An override file merged on top, key by key. The override is either an
//!    explicit path or `<config dir>/csv2qif/mappings.toml` when present.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::mapping::{FieldMapping, MappingField};
use crate::models::TransactionType;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/mappings.toml");

/// Default mapping tables, one per transaction type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConfig {
    pub investment: FieldMapping,
    pub cash: FieldMapping,
}

/// On-disk layout; every table is optional in an override file
#[derive(Debug, Deserialize)]
struct RawConfig {
    investment: Option<BTreeMap<String, String>>,
    cash: Option<BTreeMap<String, String>>,
}

impl MappingConfig {
    /// Defaults compiled into the binary
    pub fn embedded() -> Result<Self> {
        let raw = parse_raw(DEFAULT_CONFIG)?;
        Ok(Self {
            investment: to_mapping(raw.investment, "investment"),
            cash: to_mapping(raw.cash, "cash"),
        })
    }

    /// Load defaults, then apply an override file.
    ///
    /// An explicit `override_path` must exist. Without one, the platform
    /// config location is used if a file is there.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::embedded()?;

        let path = match override_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(path) = path {
            debug!("Loading mapping overrides from {}", path.display());
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            config.apply_overrides(&content)?;
        }

        Ok(config)
    }

    /// Merge a TOML override document into these mappings
    pub fn apply_overrides(&mut self, content: &str) -> Result<()> {
        let raw = parse_raw(content)?;
        if let Some(table) = raw.investment {
            self.investment.merge(&to_mapping(Some(table), "investment"));
        }
        if let Some(table) = raw.cash {
            self.cash.merge(&to_mapping(Some(table), "cash"));
        }
        Ok(())
    }

    pub fn default_for(&self, tx_type: TransactionType) -> &FieldMapping {
        match tx_type {
            TransactionType::Cash => &self.cash,
            TransactionType::Investment => &self.investment,
        }
    }
}

/// Platform override location (~/.config/csv2qif/mappings.toml on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("csv2qif").join("mappings.toml"))
}

fn parse_raw(content: &str) -> Result<RawConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
}

fn to_mapping(table: Option<BTreeMap<String, String>>, section: &str) -> FieldMapping {
    let mut mapping = FieldMapping::new();
    for (key, column) in table.unwrap_or_default() {
        match key.parse::<MappingField>() {
            Ok(field) => {
                mapping.insert(field, column);
            }
            Err(_) => warn!("Ignoring unknown field '{}' in [{}] mapping", key, section),
        }
    }
    mapping
}
