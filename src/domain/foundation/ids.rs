//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random SessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a SessionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of the contractor who owns a knowledge base.
///
/// Used as the storage key, so it is restricted to characters that are
/// safe in a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractorId(String);

impl ContractorId {
    /// Creates a new ContractorId, returning error if empty or not path-safe.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("contractor_id"));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
            || id.starts_with('.')
        {
            return Err(ValidationError::invalid_format(
                "contractor_id",
                "only ASCII letters, digits, '-', '_', '.' and '@' are allowed",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a contractor's client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new ClientId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("client_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod session_id {
        use super::*;

        #[test]
        fn new_ids_are_unique() {
            assert_ne!(SessionId::new(), SessionId::new());
        }

        #[test]
        fn round_trips_through_display_and_from_str() {
            let id = SessionId::new();
            let parsed: SessionId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }

        #[test]
        fn serializes_as_bare_uuid() {
            let uuid = Uuid::new_v4();
            let id = SessionId::from_uuid(uuid);
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", uuid));
        }
    }

    mod contractor_id {
        use super::*;

        #[test]
        fn accepts_email_like_ids() {
            let id = ContractorId::new("owner@acme-fencing.com").unwrap();
            assert_eq!(id.as_str(), "owner@acme-fencing.com");
        }

        #[test]
        fn rejects_empty_id() {
            assert!(matches!(
                ContractorId::new("  "),
                Err(ValidationError::EmptyField { .. })
            ));
        }

        #[test]
        fn rejects_path_traversal() {
            assert!(ContractorId::new("../etc/passwd").is_err());
            assert!(ContractorId::new("a/b").is_err());
            assert!(ContractorId::new(".hidden").is_err());
        }
    }

    mod client_id {
        use super::*;

        #[test]
        fn rejects_empty_id() {
            assert!(ClientId::new("").is_err());
        }

        #[test]
        fn displays_inner_value() {
            let id = ClientId::new("client-42").unwrap();
            assert_eq!(id.to_string(), "client-42");
        }
    }
}
