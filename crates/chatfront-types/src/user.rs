//! Validated per-user identity.
//!
//! The username doubles as the storage namespace (a directory name on
//! disk), so the character set is restricted. The login flow is not a
//! security boundary -- this guards the filesystem, nothing more.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::UserError;

/// Maximum accepted username length.
pub const MAX_USERNAME_LEN: usize = 64;

/// A validated username, safe to use as a directory name.
///
/// Accepted: 1 to 64 characters from `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and wrap a raw username string.
    pub fn new(raw: &str) -> Result<Self, UserError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserError::Empty);
        }
        if trimmed.len() > MAX_USERNAME_LEN {
            return Err(UserError::TooLong(trimmed.len()));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UserError::InvalidCharacters(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserName {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        for name in ["alice", "bob-42", "under_score", "X"] {
            assert!(UserName::new(name).is_ok(), "expected '{name}' to parse");
        }
    }

    #[test]
    fn test_whitespace_trimmed() {
        let user = UserName::new("  alice  ").unwrap();
        assert_eq!(user.as_str(), "alice");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(UserName::new("   "), Err(UserError::Empty)));
    }

    #[test]
    fn test_path_traversal_rejected() {
        for name in ["../evil", "a/b", "a\\b", "dot.dot", "spa ce"] {
            assert!(
                matches!(UserName::new(name), Err(UserError::InvalidCharacters(_))),
                "expected '{name}' to be rejected"
            );
        }
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "a".repeat(MAX_USERNAME_LEN + 1);
        assert!(matches!(UserName::new(&long), Err(UserError::TooLong(_))));
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let parsed: Result<UserName, _> = serde_json::from_str("\"../../etc\"");
        assert!(parsed.is_err());
    }
}
