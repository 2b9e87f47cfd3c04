//! In-memory adapters for dry runs and tests.

mod store;
mod telemetry;

pub use store::{MemoryLedger, MemoryStore};
pub use telemetry::StaticTelemetry;
