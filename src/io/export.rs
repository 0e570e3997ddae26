use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::AppError;
use crate::domain::{format_cents, CustomerRecord, Ledger};

/// Full ledger dump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub customers: Vec<CustomerRecord>,
}

/// Writes ledger contents out as CSV or JSON
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// One row per customer: `id,name,type,balance`.
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "name", "type", "balance"])?;

        let mut count = 0;
        for record in self.ledger.list() {
            csv_writer.write_record([
                record.id.as_str(),
                record.name.as_str(),
                record.kind.code(),
                format_cents(record.balance).as_str(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        debug!(rows = count, "exported balances");
        Ok(count)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            customers: self.ledger.list().into_iter().cloned().collect(),
        }
    }

    /// Pretty-printed JSON snapshot of every customer.
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot, AppError> {
        let snapshot = self.snapshot();
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        debug!(customers = snapshot.customers.len(), "exported snapshot");
        Ok(snapshot)
    }
}
