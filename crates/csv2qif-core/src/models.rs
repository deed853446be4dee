//! Data models for csv2qif

use serde::{Deserialize, Serialize};

/// Kind of source transactions being converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Cash,
    Investment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Investment => "investment",
        }
    }

    /// QIF header written before any record of this type
    pub fn qif_type(&self) -> QifType {
        match self {
            Self::Cash => QifType::Bank,
            Self::Investment => QifType::Investment,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" | "bank" => Ok(Self::Cash),
            "investment" | "invst" => Ok(Self::Investment),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// QIF account type headers
///
/// Only `Bank` and `Investment` are produced by the converter; the others
/// are available to callers building their own files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QifType {
    Bank,
    Cash,
    Investment,
    CreditCard,
    Asset,
    Liability,
}

impl QifType {
    pub fn header(&self) -> &'static str {
        match self {
            Self::Bank => "!Type:Bank",
            Self::Cash => "!Type:Cash",
            Self::Investment => "!Type:Invst",
            Self::CreditCard => "!Type:CCard",
            Self::Asset => "!Type:Oth A",
            Self::Liability => "!Type:Oth L",
        }
    }
}

impl std::fmt::Display for QifType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// Investment action codes carried in a QIF `N` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvestmentAction {
    Buy,
    Sell,
    /// Buy with cash transferred from another account
    BuyX,
    /// Sell with proceeds transferred to another account
    SellX,
    Div,
    IntInc,
    ReinvDiv,
    ShrsIn,
    ShrsOut,
    StkSplit,
    CGLong,
    CGShort,
    MargInt,
    MiscInc,
    MiscExp,
}

/// Optional investment fields whose relevance depends on the action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionField {
    Price,
    Quantity,
    Commission,
    Amount,
    Account,
}

impl ActionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Quantity => "quantity",
            Self::Commission => "commission",
            Self::Amount => "amount",
            Self::Account => "account",
        }
    }
}

impl InvestmentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::BuyX => "BuyX",
            Self::SellX => "SellX",
            Self::Div => "Div",
            Self::IntInc => "IntInc",
            Self::ReinvDiv => "ReinvDiv",
            Self::ShrsIn => "ShrsIn",
            Self::ShrsOut => "ShrsOut",
            Self::StkSplit => "StkSplit",
            Self::CGLong => "CGLong",
            Self::CGShort => "CGShort",
            Self::MargInt => "MargInt",
            Self::MiscInc => "MiscInc",
            Self::MiscExp => "MiscExp",
        }
    }

    pub fn all() -> &'static [InvestmentAction] {
        &[
            Self::Buy,
            Self::Sell,
            Self::BuyX,
            Self::SellX,
            Self::Div,
            Self::IntInc,
            Self::ReinvDiv,
            Self::ShrsIn,
            Self::ShrsOut,
            Self::StkSplit,
            Self::CGLong,
            Self::CGShort,
            Self::MargInt,
            Self::MiscInc,
            Self::MiscExp,
        ]
    }

    /// Fields an editor should offer for this action
    pub fn fields(&self) -> &'static [ActionField] {
        use ActionField::*;
        match self {
            Self::Buy | Self::Sell => &[Price, Quantity, Commission],
            Self::BuyX | Self::SellX | Self::ShrsIn | Self::ShrsOut => {
                &[Price, Quantity, Account]
            }
            Self::ReinvDiv => &[Price, Quantity, Amount],
            Self::StkSplit => &[Quantity],
            Self::Div
            | Self::IntInc
            | Self::CGLong
            | Self::CGShort
            | Self::MargInt
            | Self::MiscInc
            | Self::MiscExp => &[Amount],
        }
    }

    /// True for actions that move cash or shares to another account
    pub fn is_transfer(&self) -> bool {
        self.fields().contains(&ActionField::Account)
    }
}

impl std::str::FromStr for InvestmentAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|a| a.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown investment action: {}", s))
    }
}

impl std::fmt::Display for InvestmentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank or cash ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Canonical `MM/DD/YYYY`
    pub date: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// May name a transfer account in `[Account]` form; passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_num: Option<String>,
}

impl BankTransaction {
    pub fn new(date: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            amount,
            payee: None,
            memo: None,
            category: None,
            check_num: None,
        }
    }
}

/// A brokerage ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentTransaction {
    /// Canonical `MM/DD/YYYY`
    pub date: String,
    /// Action code, passed through without validation
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<f64>,
    /// Total cash effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Transfer counter-account for BuyX/SellX/ShrsIn/ShrsOut
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl InvestmentTransaction {
    pub fn new(date: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            action: action.into(),
            security: None,
            price: None,
            quantity: None,
            commission: None,
            amount: None,
            memo: None,
            account: None,
        }
    }
}

/// One converted CSV row
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Bank(BankTransaction),
    Investment(InvestmentTransaction),
}

impl Record {
    pub fn date(&self) -> &str {
        match self {
            Self::Bank(tx) => &tx.date,
            Self::Investment(tx) => &tx.date,
        }
    }
}
