//! Field mapping between logical QIF fields and CSV column headers

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::TransactionType;

/// Logical field names a mapping may bind to a CSV column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingField {
    Date,
    Amount,
    Action,
    Security,
    Price,
    Quantity,
    Commission,
    Memo,
    Category,
    CheckNum,
    Payee,
    Account,
}

impl MappingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Action => "action",
            Self::Security => "security",
            Self::Price => "price",
            Self::Quantity => "quantity",
            Self::Commission => "commission",
            Self::Memo => "memo",
            Self::Category => "category",
            Self::CheckNum => "check_num",
            Self::Payee => "payee",
            Self::Account => "account",
        }
    }

    pub fn all() -> &'static [MappingField] {
        &[
            Self::Date,
            Self::Amount,
            Self::Action,
            Self::Security,
            Self::Price,
            Self::Quantity,
            Self::Commission,
            Self::Memo,
            Self::Category,
            Self::CheckNum,
            Self::Payee,
            Self::Account,
        ]
    }

    /// Fields a mapping must contain for the given transaction type
    pub fn required_for(tx_type: TransactionType) -> &'static [MappingField] {
        match tx_type {
            TransactionType::Cash => &[Self::Date, Self::Amount],
            TransactionType::Investment => &[Self::Date, Self::Action, Self::Security],
        }
    }
}

impl std::str::FromStr for MappingField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown mapping field: {}", s))
    }
}

impl std::fmt::Display for MappingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Association from logical field to CSV column header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<MappingField, String>);

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column header bound to `field`, if mapped
    pub fn get(&self, field: MappingField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: MappingField, column: impl Into<String>) -> Option<String> {
        self.0.insert(field, column.into())
    }

    pub fn remove(&mut self, field: MappingField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn contains(&self, field: MappingField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MappingField, &str)> {
        self.0.iter().map(|(field, column)| (*field, column.as_str()))
    }

    /// Apply `overrides` on top of this mapping; overriding entries win
    pub fn merge(&mut self, overrides: &FieldMapping) {
        for (field, column) in overrides.iter() {
            self.0.insert(field, column.to_string());
        }
    }

    /// Required fields absent from this mapping, in declaration order
    pub fn missing_required(&self, tx_type: TransactionType) -> Vec<MappingField> {
        MappingField::required_for(tx_type)
            .iter()
            .filter(|f| !self.contains(**f))
            .copied()
            .collect()
    }

    /// Fail if any field required for `tx_type` is unmapped
    pub fn validate(&self, tx_type: TransactionType) -> Result<()> {
        let missing = self.missing_required(tx_type);
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
        Err(Error::Mapping(format!(
            "Missing required fields in mapping: {}",
            names.join(", ")
        )))
    }

    /// Mapped columns that do not appear in `headers`
    pub fn missing_columns<S: AsRef<str>>(&self, headers: &[S]) -> Vec<&str> {
        self.0
            .values()
            .map(String::as_str)
            .filter(|column| !headers.iter().any(|h| h.as_ref() == *column))
            .collect()
    }

    /// Fail if any mapped column is absent from the CSV header row
    pub fn validate_headers<S: AsRef<str>>(&self, headers: &[S]) -> Result<()> {
        let missing = self.missing_columns(headers);
        if missing.is_empty() {
            return Ok(());
        }
        let found: Vec<&str> = headers.iter().map(|h| h.as_ref()).collect();
        Err(Error::Mapping(format!(
            "CSV headers do not match mapping: missing column(s) {} (found: {})",
            missing.join(", "),
            found.join(", ")
        )))
    }

    /// Parse a JSON object of `{"field": "Column Header"}` pairs.
    ///
    /// Unknown field names are ignored with a warning.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(entries) = value else {
            return Err(Error::Mapping("Mapping must be a JSON object".into()));
        };

        let mut mapping = Self::new();
        for (key, value) in entries {
            let Ok(field) = key.parse::<MappingField>() else {
                warn!("Ignoring unknown mapping field: {}", key);
                continue;
            };
            let Value::String(column) = value else {
                return Err(Error::Mapping(format!(
                    "Mapping value for '{}' must be a string",
                    key
                )));
            };
            mapping.insert(field, column);
        }
        Ok(mapping)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Interpret `arg` as inline JSON, falling back to a JSON file path
    pub fn from_json_arg(arg: &str) -> Result<Self> {
        match Self::from_json_str(arg) {
            Ok(mapping) => Ok(mapping),
            Err(Error::Json(_)) => Self::from_json_file(Path::new(arg)),
            Err(e) => Err(e),
        }
    }
}

impl FromIterator<(MappingField, String)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (MappingField, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
