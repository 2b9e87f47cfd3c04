//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Fixed clock plus builders for telemetry, predictions and outcomes.
//! - [`config`] - Canonical configurations rooted in a temporary directory.

pub mod config;
pub mod domain;
