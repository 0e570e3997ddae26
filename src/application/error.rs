use thiserror::Error;

use crate::domain::LedgerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown {field} code: {code}")]
    UnknownCode { field: &'static str, code: String },

    #[error("Invalid fixture entry: {0}")]
    InvalidEntry(serde_json::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
