use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleKind {
    /// One-off product sale
    Standalone,
    /// Upgrade sold to an existing customer
    Upgrade,
    /// Recurring sale with an expiration date
    Subscription,
}

impl SaleKind {
    /// Single-letter code used in fixtures and reports.
    pub fn code(&self) -> &'static str {
        match self {
            SaleKind::Standalone => "S",
            SaleKind::Upgrade => "U",
            SaleKind::Subscription => "R",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "S" => Some(SaleKind::Standalone),
            "U" => Some(SaleKind::Upgrade),
            "R" => Some(SaleKind::Subscription),
            _ => None,
        }
    }
}

impl std::fmt::Display for SaleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub kind: SaleKind,
    pub item: String,
    pub date: NaiveDate,
    pub price: Cents,
    pub quantity: u32,
    pub expires_on: Option<NaiveDate>,
}

impl Sale {
    pub fn new(kind: SaleKind, item: impl Into<String>, date: NaiveDate, price: Cents) -> Self {
        Self {
            kind,
            item: item.into(),
            date,
            price,
            quantity: 1,
            expires_on: None,
        }
    }

    pub fn product(item: impl Into<String>, date: NaiveDate, price: Cents) -> Self {
        Self::new(SaleKind::Standalone, item, date, price)
    }

    pub fn upgrade(item: impl Into<String>, date: NaiveDate, price: Cents) -> Self {
        Self::new(SaleKind::Upgrade, item, date, price)
    }

    pub fn subscription(
        item: impl Into<String>,
        date: NaiveDate,
        price: Cents,
        expires_on: NaiveDate,
    ) -> Self {
        Self::new(SaleKind::Subscription, item, date, price).with_expiration(expires_on)
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_expiration(mut self, expires_on: NaiveDate) -> Self {
        self.expires_on = Some(expires_on);
        self
    }

    pub fn is_subscription(&self) -> bool {
        self.kind == SaleKind::Subscription
    }

    /// Price times quantity. Saturates instead of wrapping.
    pub fn total(&self) -> Cents {
        self.price.saturating_mul(i64::from(self.quantity))
    }

    /// One-line description, e.g. `8x Anvil [S]` or `Dynamite [R] (exp: 2025-03-20)`.
    pub fn summary(&self) -> String {
        let mut line = if self.quantity > 1 {
            format!("{}x {} [{}]", self.quantity, self.item, self.kind)
        } else {
            format!("{} [{}]", self.item, self.kind)
        };

        if let (SaleKind::Subscription, Some(expires_on)) = (self.kind, self.expires_on) {
            line.push_str(&format!(" (exp: {})", expires_on));
        }

        line
    }
}
