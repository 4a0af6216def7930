// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteChoice {
    /// Signed on purpose: indexers occasionally report negative indices and
    /// those have to be representable to be skipped.
    pub choice_index: i64,
    /// Percentage of the voter's power assigned to this choice, 0..=100.
    pub weight: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub text: String,
}

impl VoteChoice {
    #[must_use]
    pub fn new(choice_index: i64, weight: f64) -> Self {
        Self {
            choice_index,
            weight,
            color: String::new(),
            text: String::new(),
        }
    }

    /// Index as a slot into a choice list of `choice_count` entries.
    #[must_use]
    pub fn slot(&self, choice_count: usize) -> Option<usize> {
        usize::try_from(self.choice_index)
            .ok()
            .filter(|idx| *idx < choice_count)
    }
}

/// Identity key for a voter address. EVM hex addresses are
/// case-insensitive; anything else compares verbatim.
#[must_use]
pub fn voter_key(address: &str) -> String {
    if address.starts_with("0x") || address.starts_with("0X") {
        address.to_ascii_lowercase()
    } else {
        address.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub voter_address: String,
    pub voting_power: f64,
    pub choice: Vec<VoteChoice>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Vote {
    #[must_use]
    pub fn new(
        voter_address: impl Into<String>,
        voting_power: f64,
        choice: Vec<VoteChoice>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            voter_address: voter_address.into(),
            voting_power,
            choice,
            created_at,
            reason: None,
        }
    }

    /// Share of this vote's power carried by a choice with `weight`.
    #[must_use]
    pub fn proportional_power(&self, weight: f64) -> f64 {
        self.voting_power * weight / 100.0
    }

    #[must_use]
    pub fn has_usable_power(&self) -> bool {
        self.voting_power.is_finite() && self.voting_power >= 0.0
    }
}
