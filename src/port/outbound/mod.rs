//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as the
//! code-hosting API, flat-file storage, and notification sinks.

pub mod notifier;
pub mod store;
pub mod telemetry;
