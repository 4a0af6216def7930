// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Result};

pub const PROPOSAL_ID_MAX_LEN: usize = 128;
pub const EXTERNAL_ID_MAX_LEN: usize = 20;

/// Proposal group identifier. Groups are keyed by UUID upstream; anything
/// else is rejected before any fetch happens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

/// Numeric identifier assigned by an external system (discourse topic ids,
/// on-chain proposal numbers).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalId(String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProposalId(String);

impl GroupId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let parsed = Uuid::parse_str(&value).map_err(|_| Error::InvalidIdentifier {
            kind: "group_id",
            value: value.clone(),
            reason: "must be a UUID",
        })?;
        Ok(Self(parsed.hyphenated().to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ExternalId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::InvalidIdentifier {
                kind: "external_id",
                value,
                reason: "must not be empty",
            });
        }
        if value.len() > EXTERNAL_ID_MAX_LEN {
            return Err(Error::InvalidIdentifier {
                kind: "external_id",
                value,
                reason: "must be at most 20 digits",
            });
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidIdentifier {
                kind: "external_id",
                value,
                reason: "must be numeric",
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl ProposalId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::InvalidIdentifier {
                kind: "proposal_id",
                value,
                reason: "must not be empty",
            });
        }
        if value.len() > PROPOSAL_ID_MAX_LEN {
            return Err(Error::InvalidIdentifier {
                kind: "proposal_id",
                value,
                reason: "must be at most 128 characters",
            });
        }
        if value.chars().any(char::is_whitespace) {
            return Err(Error::InvalidIdentifier {
                kind: "proposal_id",
                value,
                reason: "must not contain whitespace",
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_id_traits {
    ($name:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(value: &str) -> Result<Self> {
                Self::new(value)
            }
        }
    };
}

impl_id_traits!(GroupId);
impl_id_traits!(ExternalId);
impl_id_traits!(ProposalId);
