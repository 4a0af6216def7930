// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use bijux_agora_core::{ExternalId, GroupId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::proposal::Proposal;
use crate::vote::voter_key;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    pub external_id: ExternalId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author_username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: String,
    pub topic_external_id: ExternalId,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    /// Voting power of the delegate this forum user maps to, resolved by the
    /// delegate collaborator. `None` when the user maps to no delegate.
    #[serde(default)]
    pub author_voting_power: Option<f64>,
    #[serde(default)]
    pub deleted: bool,
}

/// Identities resolved for whoever authored a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GroupAuthor {
    #[serde(default)]
    pub voter_addresses: BTreeSet<String>,
    #[serde(default)]
    pub forum_usernames: BTreeSet<String>,
}

impl GroupAuthor {
    /// Matches addresses under the same identity rule as vote deduplication.
    #[must_use]
    pub fn owns_voter(&self, address: &str) -> bool {
        let key = voter_key(address);
        self.voter_addresses
            .iter()
            .any(|known| voter_key(known) == key)
    }

    #[must_use]
    pub fn owns_username(&self, username: &str) -> bool {
        self.forum_usernames.contains(username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub author: GroupAuthor,
}
