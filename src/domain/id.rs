//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Repository identifier in `owner/name` form - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoName(String);

impl RepoName {
    /// Create a new `RepoName` without validation.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Create a `RepoName`, rejecting anything that is not `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRepoName`] when either half is empty,
    /// there is not exactly one `/`, or the name contains whitespace or commas.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidRepoName {
            name: name.to_string(),
        };
        let (owner, repo) = name.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty()
            || repo.is_empty()
            || repo.contains('/')
            || name.contains(|c: char| c.is_whitespace() || c == ',')
        {
            return Err(invalid());
        }
        Ok(Self(name.to_string()))
    }

    /// Get the repository name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RepoName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for RepoName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_owner_slash_name() {
        let name = RepoName::parse("rust-lang/rust").unwrap();
        assert_eq!(name.as_str(), "rust-lang/rust");
        assert_eq!(name.to_string(), "rust-lang/rust");
    }

    #[test]
    fn parse_rejects_malformed_names() {
        for bad in ["rust", "/rust", "rust-lang/", "a/b/c", "a b/c", "a,b/c"] {
            assert!(RepoName::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&RepoName::new("o/r")).unwrap();
        assert_eq!(json, "\"o/r\"");
    }
}
