//! Strongly-typed ID wrappers
//!
//! Entity ids are UUID newtypes generated by the ledger. `UserId` is different:
//! it is supplied by the caller and threaded explicitly through every core
//! operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a string (full UUID, optionally prefixed)
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                s.parse()
            }

            /// Check whether a user-typed short form (e.g. "txn-1a2b3c4d")
            /// identifies this ID
            pub fn matches_short(&self, s: &str) -> bool {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                !s.is_empty() && self.0.to_string().starts_with(s)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if let Ok(uuid) = Uuid::parse_str(s) {
                    return Ok(Self(uuid));
                }
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(TransactionId, "txn-");
define_id!(GoalId, "goal-");

/// Caller-supplied user identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a user id; must be non-empty and usable as a file name
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(UserIdError::Empty);
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            || id.starts_with('.')
        {
            return Err(UserIdError::InvalidCharacters(id));
        }
        Ok(Self(id))
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Errors from constructing a `UserId`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    Empty,
    InvalidCharacters(String),
}

impl fmt::Display for UserIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "User id cannot be empty"),
            Self::InvalidCharacters(id) => write!(
                f,
                "User id '{}' may only contain letters, digits, '-', '_' and '.'",
                id
            ),
        }
    }
}

impl std::error::Error for UserIdError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = TransactionId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("txn-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_id_parse_with_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = GoalId::parse(uuid_str).unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);

        let prefixed: GoalId = format!("goal-{}", uuid_str).parse().unwrap();
        assert_eq!(prefixed, id);
    }

    #[test]
    fn test_matches_short() {
        let id = TransactionId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert!(id.matches_short("txn-550e8400"));
        assert!(id.matches_short("550e"));
        assert!(!id.matches_short("txn-"));
        assert!(!id.matches_short("deadbeef"));
    }

    #[test]
    fn test_user_id_validation() {
        assert!(UserId::new("demo_user-1").is_ok());
        assert_eq!(UserId::new("  "), Err(UserIdError::Empty));
        assert!(matches!(
            UserId::new("../etc"),
            Err(UserIdError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn test_user_id_serde_validates() {
        let id: UserId = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(id.as_str(), "alice");
        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    }
}
