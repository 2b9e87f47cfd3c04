//! Local filesystem persistence: dated JSON artifacts and the CSV ledger.

pub mod codec;
mod ledger;
mod settings;
mod store;

pub use ledger::CsvLedger;
pub use settings::StorageConfig;
pub use store::FileStore;
