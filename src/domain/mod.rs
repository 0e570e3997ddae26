mod customer;
mod error;
mod ledger;
mod money;
mod sale;

pub use customer::*;
pub use error::*;
pub use ledger::*;
pub use money::*;
pub use sale::*;
