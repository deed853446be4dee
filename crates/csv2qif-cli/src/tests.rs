//! CLI command tests

use std::fs;
use std::path::{Path, PathBuf};

use csv2qif_core::{MappingField, TransactionType};

use crate::commands::{self, action_lines, parse_tx_type, resolve_mapping};

const BROKERAGE_CSV: &str = "\
Transaction Type,Trade Date,Symbol,Price,Quantity,Commission,Notes
Buy,2024-01-15,AAPL,185.92,10,4.95,Initial position
Buy,2024-01-18,MSFT,abc,5,4.95,Bad price
";

const BANK_CSV: &str = "\
Posted,Value,Description,Category,Notes,Check Number
01/15/2024,-1234.56,Test Payee,Expenses:Test,Test memo,1001
";

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// An override file keeps tests independent of the user's config directory
fn empty_config(dir: &Path) -> PathBuf {
    write_file(dir, "mappings.toml", "# no overrides\n")
}

// ========== Shared Utility Tests ==========

#[test]
fn test_parse_tx_type() {
    assert_eq!(parse_tx_type("cash").unwrap(), TransactionType::Cash);
    assert_eq!(parse_tx_type("bank").unwrap(), TransactionType::Cash);
    assert_eq!(
        parse_tx_type("investment").unwrap(),
        TransactionType::Investment
    );
    assert!(parse_tx_type("crypto").is_err());
}

#[test]
fn test_resolve_mapping_layers() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "mappings.toml", "[cash]\npayee = \"Merchant\"\n");

    let mapping = resolve_mapping(
        Some(&config),
        TransactionType::Cash,
        Some(r#"{"date": "Posted"}"#),
    )
    .unwrap();

    assert_eq!(mapping.get(MappingField::Date), Some("Posted"));
    assert_eq!(mapping.get(MappingField::Payee), Some("Merchant"));
    assert_eq!(mapping.get(MappingField::Amount), Some("Amount"));
}

#[test]
fn test_resolve_mapping_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let json = write_file(dir.path(), "mapping.json", r#"{"security": "Ticker"}"#);

    let mapping = resolve_mapping(
        Some(&config),
        TransactionType::Investment,
        Some(json.to_str().unwrap()),
    )
    .unwrap();
    assert_eq!(mapping.get(MappingField::Security), Some("Ticker"));
}

#[test]
fn test_resolve_mapping_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(resolve_mapping(Some(&missing), TransactionType::Cash, None).is_err());
}

// ========== Convert Command Tests ==========

#[test]
fn test_cmd_convert_investment() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let input = write_file(dir.path(), "trades.csv", BROKERAGE_CSV);
    let output = dir.path().join("trades.qif");

    commands::cmd_convert(
        Some(&config),
        &input,
        &output,
        "investment",
        None,
        false,
        false,
    )
    .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "!Type:Invst\nD01/15/2024\nNBuy\nYAAPL\nI185.9200\nQ10.0000\nO4.95\nMInitial position\n^\n"
    );
}

#[test]
fn test_cmd_convert_strict_fails_after_writing() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let input = write_file(dir.path(), "trades.csv", BROKERAGE_CSV);
    let output = dir.path().join("trades.qif");

    let result = commands::cmd_convert(
        Some(&config),
        &input,
        &output,
        "investment",
        None,
        false,
        true,
    );
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("--strict"));
    // Good rows are still written
    assert!(fs::read_to_string(&output).unwrap().contains("YAAPL"));
}

#[test]
fn test_cmd_convert_with_mapping_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let input = write_file(dir.path(), "bank.csv", BANK_CSV);
    let output = dir.path().join("bank.qif");

    commands::cmd_convert(
        Some(&config),
        &input,
        &output,
        "cash",
        Some(r#"{"date": "Posted", "amount": "Value"}"#),
        false,
        true,
    )
    .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("!Type:Bank\nD01/15/2024\nT-1234.56\nPTest Payee\n"));
}

#[test]
fn test_cmd_convert_header_mismatch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    // Default cash mapping expects Date/Amount, not Posted/Value
    let input = write_file(dir.path(), "bank.csv", BANK_CSV);
    let output = dir.path().join("bank.qif");

    let result = commands::cmd_convert(Some(&config), &input, &output, "cash", None, false, false);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("CSV headers do not match mapping"));
    assert!(!output.exists());
}

#[test]
fn test_cmd_convert_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let input = write_file(dir.path(), "trades.csv", BROKERAGE_CSV);
    let output = dir.path().join("trades.qif");

    for _ in 0..2 {
        commands::cmd_convert(
            Some(&config),
            &input,
            &output,
            "investment",
            None,
            false,
            false,
        )
        .unwrap();
    }
    let appended = fs::read_to_string(&output).unwrap();
    assert_eq!(appended.matches("!Type:Invst").count(), 2);

    commands::cmd_convert(
        Some(&config),
        &input,
        &output,
        "investment",
        None,
        true,
        false,
    )
    .unwrap();
    let replaced = fs::read_to_string(&output).unwrap();
    assert_eq!(replaced.matches("!Type:Invst").count(), 1);
}

#[test]
fn test_cmd_convert_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let result = commands::cmd_convert(
        Some(&config),
        &dir.path().join("missing.csv"),
        &dir.path().join("out.qif"),
        "cash",
        None,
        false,
        false,
    );
    assert!(result.is_err());
}

// ========== Reference Command Tests ==========

#[test]
fn test_cmd_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    assert!(commands::cmd_mapping(Some(&config), "investment", None).is_ok());
    assert!(commands::cmd_mapping(Some(&config), "cash", Some("not json")).is_err());
}

#[test]
fn test_action_lines() {
    let lines = action_lines();
    assert_eq!(lines.len(), 15);
    assert!(lines
        .iter()
        .any(|l| l.starts_with("Buy ") && l.ends_with("price, quantity, commission")));
    assert!(lines
        .iter()
        .any(|l| l.starts_with("StkSplit") && l.ends_with("quantity")));
    assert!(commands::cmd_actions().is_ok());
}
