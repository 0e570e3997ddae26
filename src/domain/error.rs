use thiserror::Error;

use super::{Cents, CustomerId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Customer already exists: {0}")]
    DuplicateCustomer(CustomerId),

    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("Opening balance for customer {id} must not be negative (got {balance})")]
    NegativeOpeningBalance { id: CustomerId, balance: Cents },

    #[error("Balance adjustment for customer {id} is out of range")]
    BalanceOverflow { id: CustomerId },

    #[error("Sale not allowed for customer {id}: {reason}")]
    SaleNotAllowed { id: CustomerId, reason: String },
}
