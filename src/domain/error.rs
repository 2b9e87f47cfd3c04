//! Domain validation errors for core domain types.
//!
//! These errors surface when raw telemetry violates a domain rule, such as an
//! unparseable timestamp or a malformed repository name. They are raised at
//! the telemetry boundary and propagated, never defaulted.
//!
//! # Examples
//!
//! ```
//! use repopulse::domain::error::DomainError;
//! use repopulse::domain::id::RepoName;
//!
//! let result = RepoName::parse("not-a-repo");
//! assert!(matches!(result, Err(DomainError::InvalidRepoName { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A timestamp field could not be parsed as RFC 3339.
    #[error("invalid timestamp for {field}: '{value}'")]
    InvalidTimestamp {
        /// Which telemetry field held the bad value.
        field: &'static str,
        /// The raw value received.
        value: String,
    },

    /// Repository names must look like `owner/name`.
    #[error("invalid repository name '{name}': expected owner/name")]
    InvalidRepoName {
        /// The rejected name.
        name: String,
    },

    /// Model coefficients must be finite numbers.
    #[error("model coefficient {name} must be finite, got {value}")]
    NonFiniteCoefficient {
        /// Coefficient name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
}
