//! csv2qif Core Library
//!
//! Converts CSV transaction exports into QIF:
//! - Date normalization across common input patterns
//! - Bank and investment record models with QIF serialization
//! - Field mappings from logical QIF fields to CSV columns, with defaults
//!   loaded from an embedded config and an optional override file
//! - Row-tolerant batch conversion that reports skipped rows
//! - An editable investment transaction list with JSON persistence

pub mod config;
pub mod convert;
pub mod date;
pub mod error;
pub mod ledger;
pub mod mapping;
pub mod models;
pub mod qif;

pub use config::MappingConfig;
pub use convert::{ConversionReport, Converter, RowError, RowIssue, RowResult, WriteMode};
pub use date::normalize_date;
pub use error::{DateFormatError, Error, Result};
pub use ledger::{validate_for_editing, ImportSummary, TransactionList};
pub use mapping::{FieldMapping, MappingField};
pub use models::{
    ActionField, BankTransaction, InvestmentAction, InvestmentTransaction, QifType, Record,
    TransactionType,
};
pub use qif::{QifWriter, ToQif};
