use anyhow::Result;
use custledger::application::AppError;
use custledger::domain::{CustomerKind, Ledger, SaleKind};
use custledger::io::{load_fixture, ImportOptions, Importer};

mod common;
use common::{demo_fixture, fixture, ledger_from, parse_date, write_fixture, ACME_RECORD, PYRITE_RECORD};

#[test]
fn test_import_two_customers() -> Result<()> {
    let ledger = ledger_from(&fixture(&[ACME_RECORD, PYRITE_RECORD]))?;

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.get("Acme, Inc")?.sales.len(), 3);
    assert_eq!(ledger.get("Cash 4 Pyrite")?.sales.len(), 2);
    Ok(())
}

#[test]
fn test_import_maps_fields() -> Result<()> {
    let ledger = ledger_from(&fixture(&[ACME_RECORD]))?;
    let acme = ledger.get("Acme, Inc")?;

    assert_eq!(acme.kind, CustomerKind::Subscription);
    assert_eq!(acme.acquired_on, Some(parse_date("2017-01-02")));
    assert_eq!(acme.balance, 0);

    let dynamite = &acme.sales[1];
    assert_eq!(dynamite.kind, SaleKind::Subscription);
    assert_eq!(dynamite.price, 121);
    assert_eq!(dynamite.expires_on, Some(parse_date("2025-03-20")));
    assert_eq!(acme.sales[0].quantity, 8);
    Ok(())
}

#[test]
fn test_invalid_json_is_an_error() {
    let mut ledger = Ledger::new();
    let result = Importer::new(&mut ledger)
        .import_str("sdlfkjwlerknslkcvnsldkfn1023sd;", &ImportOptions::default());

    assert!(matches!(result, Err(AppError::Json(_))));
    assert!(ledger.is_empty());
}

#[test]
fn test_non_array_fixture_is_an_error() {
    let mut ledger = Ledger::new();
    let result = Importer::new(&mut ledger)
        .import_str(r#"{"id": "c1", "name": "Alice"}"#, &ImportOptions::default());

    assert!(matches!(result, Err(AppError::Json(_))));
}

#[test]
fn test_type_errors_are_reported_per_entry() -> Result<()> {
    let json = r#"[
        {"id": "ok", "name": "Fine", "balance": "10.00"},
        {"id": "f", "name": "Float", "balance": 12.5},
        {"id": "nameless", "balance": 5},
        {"id": "last", "name": "Also Fine", "balance": 3}
    ]"#;

    let mut ledger = Ledger::new();
    let result = Importer::new(&mut ledger).import_str(json, &ImportOptions::default())?;

    assert_eq!(result.imported, 2);
    let failed: Vec<(usize, Option<&str>)> = result
        .errors
        .iter()
        .map(|e| (e.index, e.customer.as_deref()))
        .collect();
    assert_eq!(failed, [(1, Some("f")), (2, Some("nameless"))]);
    assert!(result.errors[0].error.starts_with("Invalid fixture entry"));

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.get("last")?.balance, 300);
    Ok(())
}

#[test]
fn test_validate_only_matches_real_import() -> Result<()> {
    let json = r#"[
        {"id": "c1", "name": "Alice", "balance": "-1"},
        {"id": "c1", "name": "Alice", "balance": "1"},
        {"id": "c2", "name": "Bob", "balance": 12.5},
        {"id": "c2", "name": "Bob", "balance": 2},
        {"id": "c2", "name": "Bob Again"}
    ]"#;

    let mut ledger = Ledger::new();
    let real = Importer::new(&mut ledger).import_str(json, &ImportOptions::default())?;

    let mut untouched = Ledger::new();
    let options = ImportOptions {
        validate_only: true,
        ..Default::default()
    };
    let checked = Importer::new(&mut untouched).import_str(json, &options)?;

    assert_eq!(real.imported, 2);
    assert_eq!(checked.imported, real.imported);
    let real_failed: Vec<usize> = real.errors.iter().map(|e| e.index).collect();
    let checked_failed: Vec<usize> = checked.errors.iter().map(|e| e.index).collect();
    assert_eq!(real_failed, [0, 2, 4]);
    assert_eq!(checked_failed, real_failed);
    assert!(untouched.is_empty());
    Ok(())
}

#[test]
fn test_bad_entries_are_reported_individually() -> Result<()> {
    let json = r#"[
        {"id": "ok", "name": "Fine", "balance": "10.00"},
        {"id": "neg", "name": "Negative", "balance": "-1.00"},
        {"id": "date", "name": "Bad Date", "aquisition_date": "yesterday"},
        {"id": "cash", "name": "Cash Sub", "cust_type": "C", "sales": [
            {"sale_type": "R", "item": "Box", "date": "2019-01-01", "price": "1", "expiration": "2020-01-01"}
        ]},
        {"id": "amt", "name": "Bad Amount", "balance": "ten"}
    ]"#;

    let mut ledger = Ledger::new();
    let result = Importer::new(&mut ledger).import_str(json, &ImportOptions::default())?;

    assert_eq!(result.imported, 1);
    let failed: Vec<usize> = result.errors.iter().map(|e| e.index).collect();
    assert_eq!(failed, [1, 2, 3, 4]);
    assert_eq!(result.errors[0].customer.as_deref(), Some("neg"));

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.get("ok")?.balance, 1000);
    Ok(())
}

#[test]
fn test_duplicates_in_fixture() -> Result<()> {
    let json = r#"[
        {"id": "c1", "name": "Alice", "balance": 100},
        {"id": "c1", "name": "Alice Twin", "balance": 5}
    ]"#;

    let mut ledger = Ledger::new();
    let result = Importer::new(&mut ledger).import_str(json, &ImportOptions::default())?;
    assert_eq!(result.imported, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].error.contains("already exists"));

    let mut ledger = Ledger::new();
    let options = ImportOptions {
        skip_duplicates: true,
        ..Default::default()
    };
    let result = Importer::new(&mut ledger).import_str(json, &options)?;
    assert_eq!(result.imported, 1);
    assert_eq!(result.skipped, 1);
    assert!(result.is_clean());
    assert_eq!(ledger.get("c1")?.balance, 10000);
    Ok(())
}

#[test]
fn test_reimport_reports_every_record_as_duplicate() -> Result<()> {
    let json = fixture(&[ACME_RECORD, PYRITE_RECORD]);
    let mut ledger = Ledger::new();

    let first = Importer::new(&mut ledger).import_str(&json, &ImportOptions::default())?;
    assert_eq!(first.imported, 2);

    let second = Importer::new(&mut ledger).import_str(&json, &ImportOptions::default())?;
    assert_eq!(second.imported, 0);
    assert_eq!(second.errors.len(), 2);
    assert_eq!(ledger.len(), 2);
    Ok(())
}

#[test]
fn test_load_fixture_from_file() -> Result<()> {
    let (path, _temp) = write_fixture(&fixture(&[PYRITE_RECORD]))?;
    let (ledger, result) = load_fixture(&path, &ImportOptions::default())?;

    assert!(result.is_clean());
    assert_eq!(ledger.list()[0].name, "Cash 4 Pyrite");
    Ok(())
}

#[test]
fn test_load_missing_file() {
    let result = load_fixture("/definitely/not/here.json", &ImportOptions::default());
    assert!(matches!(result, Err(AppError::Io(_))));
}

#[test]
fn test_demo_fixture_is_clean() -> Result<()> {
    let (ledger, result) = load_fixture(demo_fixture(), &ImportOptions::default())?;

    assert!(result.is_clean(), "demo fixture errors: {:?}", result.errors);
    assert_eq!(ledger.len(), 3);
    assert_eq!(ledger.get("c1")?.balance, 10000);
    Ok(())
}
