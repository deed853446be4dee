//! Editable list of investment transactions
//!
//! Backs interactive editing: entries can be added, edited, duplicated and
//! removed, imported from CSV, saved to and loaded from JSON, and exported
//! as a QIF investment file. Unlike the batch converter, entries added
//! through [`TransactionList::add`] and [`TransactionList::update`] are
//! checked against the known investment actions.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::convert::{Converter, RowError, WriteMode};
use crate::date::normalize_date;
use crate::error::{Error, Result};
use crate::mapping::FieldMapping;
use crate::models::{InvestmentAction, InvestmentTransaction, QifType, Record, TransactionType};
use crate::qif::QifWriter;

/// Check an entry for interactive editing and return it with a normalized date
pub fn validate_for_editing(tx: &InvestmentTransaction) -> Result<InvestmentTransaction> {
    let action: InvestmentAction = tx.action.parse().map_err(Error::InvalidData)?;

    let numbers = [
        ("price", tx.price),
        ("quantity", tx.quantity),
        ("commission", tx.commission),
        ("amount", tx.amount),
    ];
    for (name, value) in numbers {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(Error::InvalidData(format!("{} must be a finite number", name)));
        }
    }
    if tx.price.is_some_and(|p| p < 0.0) {
        return Err(Error::InvalidData("price cannot be negative".into()));
    }

    let mut normalized = tx.clone();
    normalized.date = normalize_date(&tx.date)?;
    normalized.action = action.as_str().to_string();
    Ok(normalized)
}

/// Result of importing CSV rows into a list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: Vec<RowError>,
}

/// Ordered, editable investment transactions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionList {
    transactions: Vec<InvestmentTransaction>,
}

impl TransactionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&InvestmentTransaction> {
        self.transactions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InvestmentTransaction> {
        self.transactions.iter()
    }

    /// Validate and append; returns the new entry's index
    pub fn add(&mut self, tx: InvestmentTransaction) -> Result<usize> {
        let tx = validate_for_editing(&tx)?;
        self.transactions.push(tx);
        Ok(self.transactions.len() - 1)
    }

    /// Validate and replace the entry at `index`
    pub fn update(&mut self, index: usize, tx: InvestmentTransaction) -> Result<()> {
        let tx = validate_for_editing(&tx)?;
        let slot = self
            .transactions
            .get_mut(index)
            .ok_or_else(|| not_found(index))?;
        *slot = tx;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<InvestmentTransaction> {
        if index >= self.transactions.len() {
            return Err(not_found(index));
        }
        Ok(self.transactions.remove(index))
    }

    /// Append a copy of the entry at `index`, optionally with a new date
    pub fn duplicate(&mut self, index: usize, date: Option<&str>) -> Result<usize> {
        let mut copy = self.get(index).cloned().ok_or_else(|| not_found(index))?;
        if let Some(date) = date {
            copy.date = normalize_date(date)?;
        }
        self.transactions.push(copy);
        Ok(self.transactions.len() - 1)
    }

    /// Append every convertible CSV row; rows that fail are reported, not added
    pub fn import_csv<R: Read>(
        &mut self,
        reader: R,
        mapping: FieldMapping,
    ) -> Result<ImportSummary> {
        let converter = Converter::new(TransactionType::Investment, mapping)?;
        let mut summary = ImportSummary::default();

        for item in converter.records(reader)? {
            match item? {
                Ok(Record::Investment(tx)) => {
                    self.transactions.push(tx);
                    summary.added += 1;
                }
                Ok(Record::Bank(_)) => {}
                Err(skipped) => {
                    warn!("Skipping row {}: {}", skipped.line, skipped.issue);
                    summary.skipped.push(skipped);
                }
            }
        }

        debug!("Imported {} transactions", summary.added);
        Ok(summary)
    }

    pub fn import_csv_file(&mut self, path: &Path, mapping: FieldMapping) -> Result<ImportSummary> {
        let file = fs::File::open(path)?;
        self.import_csv(file, mapping)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, format!("{json}\n"))?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write an investment header followed by every entry; returns the count
    pub fn export_qif<W: Write>(&self, writer: W) -> Result<usize> {
        let mut qif = QifWriter::new(writer);
        qif.write_header(QifType::Investment)?;
        for tx in &self.transactions {
            qif.write_record(tx)?;
        }
        let written = qif.records_written();
        qif.finish()?;
        Ok(written)
    }

    pub fn export_qif_file(&self, path: &Path, mode: WriteMode) -> Result<usize> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Append => options.append(true),
            WriteMode::Truncate => options.write(true).truncate(true),
        };
        self.export_qif(BufWriter::new(options.open(path)?))
    }
}

fn not_found(index: usize) -> Error {
    Error::NotFound(format!("No transaction at position {}", index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MappingConfig;

    fn buy() -> InvestmentTransaction {
        let mut tx = InvestmentTransaction::new("2024-01-15", "Buy");
        tx.security = Some("AAPL".to_string());
        tx.price = Some(185.92);
        tx.quantity = Some(10.0);
        tx
    }

    #[test]
    fn test_add_normalizes_date() {
        let mut list = TransactionList::new();
        let index = list.add(buy()).unwrap();
        assert_eq!(index, 0);
        assert_eq!(list.get(0).unwrap().date, "01/15/2024");
    }

    #[test]
    fn test_add_rejects_unknown_action() {
        let mut list = TransactionList::new();
        let tx = InvestmentTransaction::new("01/15/2024", "Purchase");
        let err = list.add(tx).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_rejects_bad_values() {
        let mut list = TransactionList::new();

        let mut negative = buy();
        negative.price = Some(-1.0);
        assert!(list.add(negative).is_err());

        let mut bad_date = buy();
        bad_date.date = "someday".to_string();
        assert!(matches!(list.add(bad_date), Err(Error::DateFormat(_))));

        let mut nan = buy();
        nan.amount = Some(f64::NAN);
        assert!(list.add(nan).is_err());
    }

    #[test]
    fn test_update_and_remove() {
        let mut list = TransactionList::new();
        list.add(buy()).unwrap();

        let mut sell = buy();
        sell.action = "Sell".to_string();
        sell.date = "01/16/2024".to_string();
        sell.price = Some(190.0);
        sell.quantity = Some(5.0);
        list.update(0, sell).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0).unwrap().action, "Sell");
        assert_eq!(list.get(0).unwrap().price, Some(190.0));

        assert!(matches!(list.update(3, buy()), Err(Error::NotFound(_))));
        let removed = list.remove(0).unwrap();
        assert_eq!(removed.action, "Sell");
        assert!(list.is_empty());
        assert!(matches!(list.remove(0), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_duplicate_with_new_date() {
        let mut list = TransactionList::new();
        list.add(buy()).unwrap();
        let index = list.duplicate(0, Some("01/16/2024")).unwrap();
        assert_eq!(index, 1);
        assert_eq!(list.get(1).unwrap().date, "01/16/2024");
        assert_eq!(list.get(1).unwrap().security, list.get(0).unwrap().security);
        assert!(list.duplicate(5, None).is_err());
    }

    #[test]
    fn test_import_csv() {
        let csv = "\
Transaction Type,Trade Date,Symbol,Price,Quantity,Commission,Notes
Buy,01/15/2024,AAPL,185.92,10,4.95,Test buy
Sell,bad date,AAPL,190,5,4.95,Test sell
";
        let mapping = MappingConfig::embedded().unwrap().investment;
        let mut list = TransactionList::new();
        let summary = list.import_csv(csv.as_bytes(), mapping).unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(list.get(0).unwrap().security.as_deref(), Some("AAPL"));
        assert_eq!(list.get(0).unwrap().commission, Some(4.95));
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");

        let mut list = TransactionList::new();
        list.add(buy()).unwrap();
        let mut div = InvestmentTransaction::new("02/01/2024", "Div");
        div.amount = Some(0.96);
        list.add(div).unwrap();
        list.save_json(&path).unwrap();

        let loaded = TransactionList::load_json(&path).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn test_export_qif() {
        let mut list = TransactionList::new();
        list.add(buy()).unwrap();
        let mut out = Vec::new();
        let written = list.export_qif(&mut out).unwrap();
        assert_eq!(written, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "!Type:Invst\nD01/15/2024\nNBuy\nYAAPL\nI185.9200\nQ10.0000\n^\n"
        );
    }

    #[test]
    fn test_export_qif_file_modes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.qif");
        let mut list = TransactionList::new();
        list.add(buy()).unwrap();

        list.export_qif_file(&path, WriteMode::Append).unwrap();
        list.export_qif_file(&path, WriteMode::Append).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("!Type:Invst").count(), 2);

        list.export_qif_file(&path, WriteMode::Truncate).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("!Type:Invst").count(), 1);
    }
}
