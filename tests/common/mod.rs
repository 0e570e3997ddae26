// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use custledger::domain::Ledger;
use custledger::io::{ImportOptions, Importer};
use tempfile::TempDir;

pub const ACME_RECORD: &str = r#"
{
  "name": "Acme, Inc",
  "aquisition_date": "2017-01-02",
  "cust_type": "R",
  "sales": [
    {
      "sale_type": "S",
      "item": "Anvil",
      "date": "2019-04-01",
      "price": "29.99",
      "quantity": 8
    },
    {
      "sale_type": "R",
      "item": "Dynamite",
      "date": "2019-03-20",
      "price": "1.21",
      "quantity": 1,
      "expiration": "2025-03-20"
    },
    {
      "sale_type": "U",
      "item": "Longer Fuse",
      "date": "2019-03-20",
      "price": "0.01",
      "quantity": 1
    }
  ]
}
"#;

pub const PYRITE_RECORD: &str = r#"
{
  "name": "Cash 4 Pyrite",
  "aquisition_date": "1972-01-02",
  "cust_type": "A",
  "sales": [
    {
      "sale_type": "S",
      "item": "Authentic Gold Bricks",
      "date": "2019-04-01",
      "price": "8001.00",
      "quantity": 3
    },
    {
      "sale_type": "U",
      "item": "Software Unlock to Actual Gold",
      "date": "2020-01-01",
      "price": "37.99",
      "quantity": 3
    }
  ]
}
"#;

/// Wrap fixture records into a JSON array.
pub fn fixture(records: &[&str]) -> String {
    format!("[{}]", records.join(","))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Build a ledger from fixture JSON, failing on any rejected entry.
pub fn ledger_from(json: &str) -> Result<Ledger> {
    let mut ledger = Ledger::new();
    let result = Importer::new(&mut ledger).import_str(json, &ImportOptions::default())?;
    anyhow::ensure!(result.is_clean(), "fixture rejected: {:?}", result.errors);
    Ok(ledger)
}

/// Write fixture JSON to a temporary file. Keep the TempDir alive while the file is in use.
pub fn write_fixture(json: &str) -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("fixture.json");
    std::fs::write(&path, json)?;
    Ok((path, temp_dir))
}

/// Path of the fixture shipped with the demo
pub fn demo_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/demo.json")
}
