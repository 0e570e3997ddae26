use std::fmt::Write as _;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{format_cents, Cents, CustomerKind, Ledger, Sale};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReport {
    pub as_of: NaiveDate,
    pub window_start: NaiveDate,
    pub customers: Vec<CustomerSummary>,
    pub total_balance: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub kind: CustomerKind,
    pub balance: Cents,
    pub age_years: Option<f64>,
    pub recent_sales: Vec<Sale>,
    pub recent_total: Cents,
}

/// Summarise every customer with the purchases made in the twelve months
/// ending at `as_of`.
pub fn build_report(ledger: &Ledger, as_of: NaiveDate) -> LedgerReport {
    // Feb 29 falls back to Feb 28 of the previous year
    let window_start = as_of
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);

    let customers = ledger
        .list()
        .into_iter()
        .map(|record| {
            let recent_sales: Vec<Sale> = record
                .find_sales(Some(window_start), Some(as_of))
                .into_iter()
                .cloned()
                .collect();
            let recent_total = recent_sales
                .iter()
                .fold(0, |total: Cents, sale| total.saturating_add(sale.total()));

            CustomerSummary {
                id: record.id.clone(),
                name: record.name.clone(),
                kind: record.kind,
                balance: record.balance,
                age_years: record.age_years(as_of),
                recent_sales,
                recent_total,
            }
        })
        .collect();

    LedgerReport {
        as_of,
        window_start,
        customers,
        total_balance: ledger.total_balance(),
    }
}

impl CustomerSummary {
    /// Header line, e.g.
    /// `Acme, Inc [S], Balance: 12.00, Duration: 3.0 years, Purchases in the last year:`
    pub fn headline(&self) -> String {
        let mut line = format!(
            "{} [{}], Balance: {}, ",
            self.name,
            self.kind,
            format_cents(self.balance)
        );
        if let Some(years) = self.age_years {
            let _ = write!(line, "Duration: {:.1} years, ", years);
        }
        line.push_str("Purchases in the last year:");
        line
    }
}

impl LedgerReport {
    /// Plain-text rendering used by the demo.
    pub fn render(&self) -> String {
        let mut out = String::from("Customers:\n");

        if self.customers.is_empty() {
            out.push_str("(none)\n");
            return out;
        }

        for customer in &self.customers {
            out.push_str(&customer.headline());
            out.push('\n');

            if customer.recent_sales.is_empty() {
                out.push_str("    (none)\n");
            }
            for sale in &customer.recent_sales {
                let _ = writeln!(out, "    {}", sale.summary());
            }
        }

        out
    }
}
