use std::collections::HashMap;

use tracing::debug;

use super::{Cents, CustomerId, CustomerRecord, LedgerError, Sale};

/// In-memory store of customer records keyed by identifier.
///
/// Listing follows insertion order. Every mutation either succeeds or
/// returns an error with the ledger left untouched.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    customers: HashMap<CustomerId, CustomerRecord>,
    order: Vec<CustomerId>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a customer with the default kind and no history.
    pub fn add(
        &mut self,
        id: impl Into<CustomerId>,
        name: impl Into<String>,
        initial_balance: Cents,
    ) -> Result<&CustomerRecord, LedgerError> {
        self.insert(CustomerRecord::new(id, name, initial_balance))
    }

    /// Store a fully built record under its own identifier.
    pub fn insert(&mut self, record: CustomerRecord) -> Result<&CustomerRecord, LedgerError> {
        if self.customers.contains_key(&record.id) {
            return Err(LedgerError::DuplicateCustomer(record.id));
        }
        if record.balance < 0 {
            return Err(LedgerError::NegativeOpeningBalance {
                id: record.id,
                balance: record.balance,
            });
        }
        for sale in &record.sales {
            check_sale(&record, sale)?;
        }

        debug!(customer = %record.id, balance = record.balance, "adding customer");

        let id = record.id.clone();
        self.order.push(id.clone());
        Ok(&*self.customers.entry(id).or_insert(record))
    }

    pub fn get(&self, id: &str) -> Result<&CustomerRecord, LedgerError> {
        self.customers
            .get(id)
            .ok_or_else(|| LedgerError::CustomerNotFound(id.to_string()))
    }

    /// Apply `delta` to the customer's balance and return the new balance.
    /// The result may be negative.
    pub fn adjust_balance(&mut self, id: &str, delta: Cents) -> Result<Cents, LedgerError> {
        let record = self.get_mut(id)?;
        let balance = record
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::BalanceOverflow { id: id.to_string() })?;

        debug!(customer = id, delta, balance, "adjusting balance");
        record.balance = balance;
        Ok(balance)
    }

    pub fn remove(&mut self, id: &str) -> Result<CustomerRecord, LedgerError> {
        let record = self
            .customers
            .remove(id)
            .ok_or_else(|| LedgerError::CustomerNotFound(id.to_string()))?;
        self.order.retain(|existing| existing != id);

        debug!(customer = id, "removed customer");
        Ok(record)
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<&CustomerRecord> {
        self.order
            .iter()
            .filter_map(|id| self.customers.get(id))
            .collect()
    }

    /// Append a sale to a customer's history.
    pub fn record_sale(&mut self, id: &str, sale: Sale) -> Result<(), LedgerError> {
        let record = self.get_mut(id)?;
        check_sale(record, &sale)?;

        debug!(customer = id, item = %sale.item, kind = %sale.kind, "recording sale");
        record.sales.push(sale);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.customers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of all balances. Saturates at the `i64` bounds.
    pub fn total_balance(&self) -> Cents {
        self.customers
            .values()
            .fold(0, |total: Cents, record| total.saturating_add(record.balance))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut CustomerRecord, LedgerError> {
        self.customers
            .get_mut(id)
            .ok_or_else(|| LedgerError::CustomerNotFound(id.to_string()))
    }
}

fn check_sale(record: &CustomerRecord, sale: &Sale) -> Result<(), LedgerError> {
    if !sale.is_subscription() {
        return Ok(());
    }
    if !record.kind.accepts_subscriptions() {
        return Err(LedgerError::SaleNotAllowed {
            id: record.id.clone(),
            reason: "cash customers cannot hold subscriptions".to_string(),
        });
    }
    if sale.expires_on.is_none() {
        return Err(LedgerError::SaleNotAllowed {
            id: record.id.clone(),
            reason: format!("subscription '{}' has no expiration date", sale.item),
        });
    }
    Ok(())
}
