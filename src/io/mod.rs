pub mod export;
pub mod import;

pub use export::{Exporter, LedgerSnapshot};
pub use import::{
    load_fixture, FixtureAmount, FixtureCustomer, FixtureSale, ImportError, ImportOptions,
    ImportResult, Importer,
};
