//! Outbound adapters (driven side).

pub mod filesystem;
pub mod github;
pub mod memory;
pub mod notifier;
