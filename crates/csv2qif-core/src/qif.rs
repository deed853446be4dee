//! QIF record serialization
//!
//! Each record is a block of single-letter field lines terminated by a lone
//! `^`. Field order is fixed per record kind:
//! - Bank: `D`, `T`, `P`, `M`, `L`, `N`
//! - Investment: `D`, `N`, `Y`, `I`, `Q`, `O`, `T`, `L[..]`, `M`

use std::io::Write;

use crate::error::Result;
use crate::models::{BankTransaction, InvestmentTransaction, QifType, Record};

/// Record terminator line
pub const END_OF_RECORD: &str = "^";

/// Serialize a record to its QIF text block (no trailing newline)
pub trait ToQif {
    fn to_qif(&self) -> String;
}

/// Present and non-empty
fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl ToQif for BankTransaction {
    fn to_qif(&self) -> String {
        let mut lines = vec![format!("D{}", self.date), format!("T{:.2}", self.amount)];
        if let Some(payee) = text(&self.payee) {
            lines.push(format!("P{}", payee));
        }
        if let Some(memo) = text(&self.memo) {
            lines.push(format!("M{}", memo));
        }
        if let Some(category) = text(&self.category) {
            lines.push(format!("L{}", category));
        }
        if let Some(check_num) = text(&self.check_num) {
            lines.push(format!("N{}", check_num));
        }
        lines.push(END_OF_RECORD.to_string());
        lines.join("\n")
    }
}

impl ToQif for InvestmentTransaction {
    fn to_qif(&self) -> String {
        let mut lines = vec![format!("D{}", self.date), format!("N{}", self.action)];
        if let Some(security) = text(&self.security) {
            lines.push(format!("Y{}", security));
        }
        if let Some(price) = self.price {
            lines.push(format!("I{:.4}", price));
        }
        if let Some(quantity) = self.quantity {
            lines.push(format!("Q{:.4}", quantity));
        }
        // A zero commission is written as no commission at all
        if let Some(commission) = self.commission.filter(|c| *c != 0.0) {
            lines.push(format!("O{:.2}", commission));
        }
        if let Some(amount) = self.amount {
            lines.push(format!("T{:.2}", amount));
        }
        if let Some(account) = text(&self.account) {
            lines.push(format!("L[{}]", account));
        }
        if let Some(memo) = text(&self.memo) {
            lines.push(format!("M{}", memo));
        }
        lines.push(END_OF_RECORD.to_string());
        lines.join("\n")
    }
}

impl ToQif for Record {
    fn to_qif(&self) -> String {
        match self {
            Self::Bank(tx) => tx.to_qif(),
            Self::Investment(tx) => tx.to_qif(),
        }
    }
}

/// Streams a QIF header and records into a sink
pub struct QifWriter<W: Write> {
    inner: W,
    records: usize,
}

impl<W: Write> QifWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, records: 0 }
    }

    pub fn write_header(&mut self, qif_type: QifType) -> Result<()> {
        writeln!(self.inner, "{}", qif_type.header())?;
        Ok(())
    }

    pub fn write_record<T: ToQif + ?Sized>(&mut self, record: &T) -> Result<()> {
        writeln!(self.inner, "{}", record.to_qif())?;
        self.records += 1;
        Ok(())
    }

    /// Records written so far
    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Flush and hand back the sink
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
