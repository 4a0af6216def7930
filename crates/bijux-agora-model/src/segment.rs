// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One renderable slice of a choice's vote bar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VoteSegment {
    pub voting_power: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_aggregated: bool,
}

impl VoteSegment {
    #[must_use]
    pub const fn individual(voting_power: f64) -> Self {
        Self {
            voting_power,
            is_aggregated: false,
        }
    }

    #[must_use]
    pub const fn aggregated(voting_power: f64) -> Self {
        Self {
            voting_power,
            is_aggregated: true,
        }
    }
}

/// Segments keyed by the decimal string of the choice index.
pub type VoteSegments = BTreeMap<String, Vec<VoteSegment>>;
