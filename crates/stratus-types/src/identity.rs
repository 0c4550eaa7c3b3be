//! Resource identities.

use serde::{Deserialize, Serialize};

/// Identifies a resource by its server-assigned numeric id or its
/// caller-assigned external id. The two are mutually exclusive per target;
/// operations taking collections accept a mix of both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identity {
    /// Server-assigned numeric id.
    Id {
        /// The numeric id.
        id: i64,
    },
    /// Caller-assigned external id.
    ExternalId {
        /// The external id string.
        #[serde(rename = "externalId")]
        external_id: String,
    },
}

impl Identity {
    /// Identity from a numeric id.
    #[must_use]
    pub const fn id(id: i64) -> Self {
        Self::Id { id }
    }

    /// Identity from an external id.
    pub fn external_id(external_id: impl Into<String>) -> Self {
        Self::ExternalId {
            external_id: external_id.into(),
        }
    }

    /// Returns the numeric id, if this identity carries one.
    #[must_use]
    pub const fn as_id(&self) -> Option<i64> {
        match self {
            Self::Id { id } => Some(*id),
            Self::ExternalId { .. } => None,
        }
    }

    /// Returns the external id, if this identity carries one.
    #[must_use]
    pub fn as_external_id(&self) -> Option<&str> {
        match self {
            Self::Id { .. } => None,
            Self::ExternalId { external_id } => Some(external_id),
        }
    }
}

impl From<i64> for Identity {
    fn from(id: i64) -> Self {
        Self::id(id)
    }
}

impl From<&str> for Identity {
    fn from(external_id: &str) -> Self {
        Self::external_id(external_id)
    }
}

impl From<String> for Identity {
    fn from(external_id: String) -> Self {
        Self::external_id(external_id)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id { id } => write!(f, "id={id}"),
            Self::ExternalId { external_id } => write!(f, "externalId={external_id}"),
        }
    }
}
