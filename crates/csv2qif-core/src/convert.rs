//! Batch CSV → QIF conversion
//!
//! Rows are read lazily and turned into [`Record`]s through a
//! [`FieldMapping`]. A row that fails to convert is reported as a
//! [`RowError`] and skipped; it never aborts the batch. Only a bad mapping
//! (checked before anything is read or written) and I/O failures are fatal.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use csv::{ByteRecordsIntoIter, ReaderBuilder, StringRecord};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::date::normalize_date;
use crate::error::{DateFormatError, Result};
use crate::mapping::{FieldMapping, MappingField};
use crate::models::{BankTransaction, InvestmentTransaction, Record, TransactionType};
use crate::qif::QifWriter;

/// Why a single row could not be converted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowIssue {
    #[error("missing column '{column}' for field {field}")]
    MissingColumn { field: MappingField, column: String },

    #[error("invalid number '{value}' for field {field}")]
    InvalidNumber { field: MappingField, value: String },

    #[error(transparent)]
    Date(#[from] DateFormatError),

    #[error("malformed CSV record: {0}")]
    Malformed(String),
}

/// A skipped row: where it was, what it contained, and why it failed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}: {issue}")]
pub struct RowError {
    /// 1-based line in the source file (0 if unknown)
    pub line: u64,
    /// Row content as a JSON object keyed by column header
    pub row: String,
    pub issue: RowIssue,
}

/// Outcome of converting one row
pub type RowResult = std::result::Result<Record, RowError>;

/// How the destination file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Keep existing content; a second run adds a second header and repeats records
    #[default]
    Append,
    /// Replace any existing content
    Truncate,
}

/// Summary of a batch conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    pub records_written: usize,
    pub skipped: Vec<RowError>,
    /// Stopped early by the cancel flag
    pub cancelled: bool,
}

impl ConversionReport {
    /// Data rows consumed, written or skipped
    pub fn rows_read(&self) -> usize {
        self.records_written + self.skipped.len()
    }
}

/// Converts CSV rows of one transaction type using one mapping
#[derive(Debug, Clone)]
pub struct Converter {
    tx_type: TransactionType,
    mapping: FieldMapping,
    cancel: Option<Arc<AtomicBool>>,
}

impl Converter {
    /// Fails if `mapping` lacks a field required for `tx_type`
    pub fn new(tx_type: TransactionType, mapping: FieldMapping) -> Result<Self> {
        mapping.validate(tx_type)?;
        Ok(Self {
            tx_type,
            mapping,
            cancel: None,
        })
    }

    /// Stop between rows once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.tx_type
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Lazily convert the rows of a CSV source with a header line
    pub fn records<R: Read>(&self, reader: R) -> Result<Records<'_, R>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let columns = MappingField::all()
            .iter()
            .filter_map(|field| {
                let column = self.mapping.get(*field)?;
                // Later duplicates win, like a dict built from the header row
                let index = headers
                    .iter()
                    .enumerate()
                    .filter(|(_, h)| *h == column)
                    .last()
                    .map(|(i, _)| i);
                Some((*field, index))
            })
            .collect::<HashMap<_, _>>();

        debug!("Resolved column indices: {:?}", columns);

        Ok(Records {
            converter: self,
            headers,
            columns,
            rows: rdr.into_byte_records(),
        })
    }

    /// Write the QIF header and one block per convertible row to `writer`
    pub fn convert<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<ConversionReport> {
        let mut records = self.records(reader)?;
        let mut qif = QifWriter::new(writer);
        qif.write_header(self.tx_type.qif_type())?;

        let mut report = ConversionReport::default();
        loop {
            if self.is_cancelled() {
                info!(
                    "Conversion cancelled after {} rows",
                    qif.records_written() + report.skipped.len()
                );
                report.cancelled = true;
                break;
            }
            let Some(item) = records.next() else {
                break;
            };
            match item? {
                Ok(record) => qif.write_record(&record)?,
                Err(skipped) => {
                    warn!(
                        "Skipping row {}: {} (row: {})",
                        skipped.line, skipped.issue, skipped.row
                    );
                    report.skipped.push(skipped);
                }
            }
        }

        report.records_written = qif.records_written();
        qif.finish()?;
        Ok(report)
    }

    /// Convert `input` into `output`, holding the output open only for this call
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        mode: WriteMode,
    ) -> Result<ConversionReport> {
        let source = File::open(input)?;

        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Append => options.append(true),
            WriteMode::Truncate => options.write(true).truncate(true),
        };
        let destination = BufWriter::new(options.open(output)?);

        let report = self.convert(source, destination)?;
        info!(
            "Converted {} -> {}: {} written, {} skipped",
            input.display(),
            output.display(),
            report.records_written,
            report.skipped.len()
        );
        Ok(report)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Lazy sequence of converted rows.
///
/// The outer `Result` is fatal (I/O); the inner one is a skipped row.
pub struct Records<'a, R: Read> {
    converter: &'a Converter,
    headers: StringRecord,
    columns: HashMap<MappingField, Option<usize>>,
    rows: ByteRecordsIntoIter<R>,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<RowResult>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = match self.rows.next()? {
            Ok(raw) => raw,
            Err(e) if e.is_io_error() => return Some(Err(e.into())),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                return Some(Ok(Err(RowError {
                    line,
                    row: String::new(),
                    issue: RowIssue::Malformed(e.to_string()),
                })));
            }
        };

        let line = raw.position().map(|p| p.line()).unwrap_or(0);
        let record = match StringRecord::from_byte_record(raw) {
            Ok(record) => record,
            Err(e) => {
                let issue = RowIssue::Malformed(e.utf8_error().to_string());
                let lossy: StringRecord = e
                    .into_byte_record()
                    .iter()
                    .map(String::from_utf8_lossy)
                    .collect();
                return Some(Ok(Err(RowError {
                    line,
                    row: record_to_json(&self.headers, &lossy),
                    issue,
                })));
            }
        };

        let row = RowView {
            mapping: &self.converter.mapping,
            columns: &self.columns,
            record: &record,
        };
        let built = match self.converter.tx_type {
            TransactionType::Cash => row.bank().map(Record::Bank),
            TransactionType::Investment => row.investment().map(Record::Investment),
        };

        Some(Ok(built.map_err(|issue| RowError {
            line,
            row: record_to_json(&self.headers, &record),
            issue,
        })))
    }
}

/// Convert a CSV record to a JSON object using headers as keys
fn record_to_json(headers: &StringRecord, record: &StringRecord) -> String {
    let mut map = serde_json::Map::new();
    for (i, header) in headers.iter().enumerate() {
        if let Some(value) = record.get(i) {
            map.insert(header.to_string(), Value::String(value.to_string()));
        }
    }
    json!(map).to_string()
}

/// Mapping-aware accessors over one CSV record
struct RowView<'a> {
    mapping: &'a FieldMapping,
    columns: &'a HashMap<MappingField, Option<usize>>,
    record: &'a StringRecord,
}

impl RowView<'_> {
    /// Cell for a mapped field; `None` if the field is unmapped
    fn cell(&self, field: MappingField) -> Option<std::result::Result<&str, RowIssue>> {
        let index = self.columns.get(&field)?;
        Some(index.and_then(|i| self.record.get(i)).ok_or_else(|| {
            RowIssue::MissingColumn {
                field,
                column: self.mapping.get(field).unwrap_or_default().to_string(),
            }
        }))
    }

    fn required(&self, field: MappingField) -> std::result::Result<&str, RowIssue> {
        self.cell(field).unwrap_or_else(|| {
            Err(RowIssue::MissingColumn {
                field,
                column: String::new(),
            })
        })
    }

    /// Optional text; empty cells are absent
    fn text(&self, field: MappingField) -> std::result::Result<Option<String>, RowIssue> {
        match self.cell(field) {
            None => Ok(None),
            Some(cell) => Ok(Some(cell?).filter(|s| !s.is_empty()).map(String::from)),
        }
    }

    /// Optional number; unmapped, missing or blank cells are absent
    fn number(&self, field: MappingField) -> std::result::Result<Option<f64>, RowIssue> {
        match self.cell(field) {
            Some(Ok(raw)) if !raw.trim().is_empty() => parse_number(field, raw).map(Some),
            _ => Ok(None),
        }
    }

    fn date(&self) -> std::result::Result<String, RowIssue> {
        Ok(normalize_date(self.required(MappingField::Date)?)?)
    }

    fn bank(&self) -> std::result::Result<BankTransaction, RowIssue> {
        Ok(BankTransaction {
            date: self.date()?,
            amount: parse_number(MappingField::Amount, self.required(MappingField::Amount)?)?,
            payee: self.text(MappingField::Payee)?,
            memo: self.text(MappingField::Memo)?,
            category: self.text(MappingField::Category)?,
            check_num: self.text(MappingField::CheckNum)?,
        })
    }

    fn investment(&self) -> std::result::Result<InvestmentTransaction, RowIssue> {
        Ok(InvestmentTransaction {
            date: self.date()?,
            action: self.required(MappingField::Action)?.to_string(),
            security: self.text(MappingField::Security)?,
            price: self.number(MappingField::Price)?,
            quantity: self.number(MappingField::Quantity)?,
            commission: self.number(MappingField::Commission)?,
            amount: self.number(MappingField::Amount)?,
            memo: self.text(MappingField::Memo)?,
            account: self.text(MappingField::Account)?,
        })
    }
}

/// Parse a decimal cell; surrounding whitespace is ignored
fn parse_number(field: MappingField, raw: &str) -> std::result::Result<f64, RowIssue> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| RowIssue::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
