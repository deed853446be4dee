//! Error types for csv2qif

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error(transparent)]
    DateFormat(#[from] DateFormatError),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// A date string matched none of the accepted input patterns
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported date format: {0}")]
pub struct DateFormatError(pub String);

pub type Result<T> = std::result::Result<T, Error>;
