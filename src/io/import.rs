use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::application::AppError;
use crate::domain::{
    parse_cents, Cents, CustomerKind, CustomerRecord, LedgerError, Ledger, Sale, SaleKind,
};

/// Monetary value in a fixture: a decimal string (`"29.99"`) or a whole number of units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixtureAmount {
    Decimal(String),
    Whole(i64),
}

impl FixtureAmount {
    pub fn to_cents(&self) -> Result<Cents, AppError> {
        match self {
            FixtureAmount::Decimal(text) => {
                parse_cents(text).map_err(|e| AppError::InvalidAmount {
                    value: text.clone(),
                    reason: e.to_string(),
                })
            }
            FixtureAmount::Whole(units) => {
                units
                    .checked_mul(100)
                    .ok_or_else(|| AppError::InvalidAmount {
                        value: units.to_string(),
                        reason: "amount out of range".to_string(),
                    })
            }
        }
    }
}

/// One customer entry of a JSON fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCustomer {
    /// Defaults to `name` when absent or empty
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub balance: Option<FixtureAmount>,
    #[serde(default)]
    pub cust_type: Option<String>,
    #[serde(default, alias = "aquisition_date")]
    pub acquisition_date: Option<String>,
    #[serde(default)]
    pub sales: Vec<FixtureSale>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSale {
    pub sale_type: String,
    pub item: String,
    pub date: String,
    pub price: FixtureAmount,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub expiration: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

impl FixtureCustomer {
    /// Decode one raw fixture entry.
    pub fn from_value(value: &Value) -> Result<Self, AppError> {
        serde_json::from_value(value.clone()).map_err(AppError::InvalidEntry)
    }

    pub fn customer_id(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.name,
        }
    }

    /// Convert into a domain record. Ledger rules (duplicates, opening
    /// balance, sale restrictions) are checked on insert, not here.
    pub fn to_record(&self) -> Result<CustomerRecord, AppError> {
        let balance = match &self.balance {
            Some(amount) => amount.to_cents()?,
            None => 0,
        };

        let mut record = CustomerRecord::new(self.customer_id(), self.name.clone(), balance);

        if let Some(code) = &self.cust_type {
            let kind = CustomerKind::from_code(code).ok_or_else(|| AppError::UnknownCode {
                field: "customer type",
                code: code.clone(),
            })?;
            record = record.with_kind(kind);
        }

        if let Some(date) = &self.acquisition_date {
            record = record.with_acquired_on(parse_date(date)?);
        }

        record.sales = self
            .sales
            .iter()
            .map(FixtureSale::to_sale)
            .collect::<Result<_, _>>()?;

        Ok(record)
    }
}

impl FixtureSale {
    pub fn to_sale(&self) -> Result<Sale, AppError> {
        let kind = SaleKind::from_code(&self.sale_type).ok_or_else(|| AppError::UnknownCode {
            field: "sale type",
            code: self.sale_type.clone(),
        })?;

        let mut sale = Sale::new(
            kind,
            self.item.clone(),
            parse_date(&self.date)?,
            self.price.to_cents()?,
        )
        .with_quantity(self.quantity);

        if let Some(expiration) = &self.expiration {
            sale = sale.with_expiration(parse_date(expiration)?);
        }

        Ok(sale)
    }
}

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

impl ImportResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Error attached to one fixture entry
#[derive(Debug, Clone)]
pub struct ImportError {
    /// Zero-based position in the fixture array
    pub index: usize,
    pub customer: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Count duplicate identifiers as skipped instead of failed
    pub skip_duplicates: bool,
    /// Parse and check every entry without touching the ledger
    pub validate_only: bool,
}

/// Seeds a ledger from a JSON fixture.
pub struct Importer<'a> {
    ledger: &'a mut Ledger,
}

impl<'a> Importer<'a> {
    pub fn new(ledger: &'a mut Ledger) -> Self {
        Self { ledger }
    }

    /// Import a fixture from any reader. Input that is not a JSON array
    /// aborts the whole import; problems with individual entries, type
    /// errors included, are collected in the result.
    pub fn import_json<R: Read>(
        &mut self,
        reader: R,
        options: &ImportOptions,
    ) -> Result<ImportResult, AppError> {
        let entries: Vec<Value> = serde_json::from_reader(reader)?;
        Ok(self.import_values(&entries, options))
    }

    pub fn import_str(
        &mut self,
        json: &str,
        options: &ImportOptions,
    ) -> Result<ImportResult, AppError> {
        self.import_json(json.as_bytes(), options)
    }

    pub fn import_values(&mut self, entries: &[Value], options: &ImportOptions) -> ImportResult {
        let mut result = ImportResult::default();
        // Mirrors the inserts a real import would make
        let mut scratch = Ledger::new();

        for (index, value) in entries.iter().enumerate() {
            let customer = entry_label(value);
            let outcome = FixtureCustomer::from_value(value)
                .and_then(|entry| entry.to_record())
                .and_then(|record| {
                    if options.validate_only {
                        validate_record(self.ledger, &mut scratch, record)
                    } else {
                        self.ledger.insert(record).map(|_| ()).map_err(AppError::from)
                    }
                });

            match outcome {
                Ok(()) => result.imported += 1,
                Err(AppError::Ledger(LedgerError::DuplicateCustomer(_)))
                    if options.skip_duplicates =>
                {
                    result.skipped += 1;
                }
                Err(e) => {
                    warn!(index, customer = customer.as_deref().unwrap_or("?"), error = %e, "rejected fixture entry");
                    result.errors.push(ImportError {
                        index,
                        customer,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            imported = result.imported,
            skipped = result.skipped,
            errors = result.errors.len(),
            validate_only = options.validate_only,
            "fixture import finished"
        );

        result
    }
}

/// Identifier of a raw entry, falling back to its name like `customer_id`.
fn entry_label(value: &Value) -> Option<String> {
    value
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .or_else(|| value.get("name").and_then(Value::as_str))
        .map(str::to_string)
}

/// Apply the insert rules without touching `ledger`. `scratch` collects the
/// entries accepted so far, so only valid entries reserve their id.
fn validate_record(
    ledger: &Ledger,
    scratch: &mut Ledger,
    record: CustomerRecord,
) -> Result<(), AppError> {
    if ledger.contains(&record.id) {
        return Err(LedgerError::DuplicateCustomer(record.id).into());
    }
    scratch.insert(record)?;
    Ok(())
}

/// Open `path` and import it into a fresh ledger.
pub fn load_fixture(
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<(Ledger, ImportResult), AppError> {
    let file = File::open(path.as_ref())?;
    let mut ledger = Ledger::new();
    let result = Importer::new(&mut ledger).import_json(BufReader::new(file), options)?;
    Ok((ledger, result))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}
