use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, Sale};

pub type CustomerId = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerKind {
    /// Pays on the spot for standalone purchases
    Cash,
    /// Billed through an account
    #[default]
    Account,
    /// Billed periodically
    Subscription,
}

impl CustomerKind {
    /// Single-letter code used in fixtures and reports.
    pub fn code(&self) -> &'static str {
        match self {
            CustomerKind::Cash => "C",
            CustomerKind::Account => "A",
            CustomerKind::Subscription => "S",
        }
    }

    /// Parse a customer code. `R` is accepted as a synonym for subscription
    /// because older fixtures reuse the sale code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "C" => Some(CustomerKind::Cash),
            "A" => Some(CustomerKind::Account),
            "S" | "R" => Some(CustomerKind::Subscription),
            _ => None,
        }
    }

    /// Whether customers of this kind may hold subscription sales.
    pub fn accepts_subscriptions(&self) -> bool {
        !matches!(self, CustomerKind::Cash)
    }
}

impl std::fmt::Display for CustomerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub balance: Cents,
    pub kind: CustomerKind,
    pub acquired_on: Option<NaiveDate>,
    pub sales: Vec<Sale>,
}

impl CustomerRecord {
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>, balance: Cents) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance,
            kind: CustomerKind::default(),
            acquired_on: None,
            sales: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: CustomerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_acquired_on(mut self, acquired_on: NaiveDate) -> Self {
        self.acquired_on = Some(acquired_on);
        self
    }

    /// Days between acquisition and `as_of`, if the acquisition date is known.
    pub fn age_days(&self, as_of: NaiveDate) -> Option<i64> {
        self.acquired_on
            .map(|acquired| (as_of - acquired).num_days())
    }

    /// Approximate age in years (365-day years).
    pub fn age_years(&self, as_of: NaiveDate) -> Option<f64> {
        self.age_days(as_of).map(|days| days as f64 / 365.0)
    }

    /// Sales dated within `[from, to]`. Missing bounds are open.
    pub fn find_sales(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Vec<&Sale> {
        self.sales
            .iter()
            .filter(|sale| from.is_none_or(|from| sale.date >= from))
            .filter(|sale| to.is_none_or(|to| sale.date <= to))
            .collect()
    }
}
