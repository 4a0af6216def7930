// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use bijux_agora_core::ProposalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum VoteType {
    #[default]
    Basic,
    Weighted,
    Approval,
    Quadratic,
    RankedChoice,
    SingleChoice,
}

impl VoteType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Weighted => "weighted",
            Self::Approval => "approval",
            Self::Quadratic => "quadratic",
            Self::RankedChoice => "ranked-choice",
            Self::SingleChoice => "single-choice",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProposalSource {
    Onchain,
    Offchain,
}

impl ProposalSource {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Onchain => "Onchain",
            Self::Offchain => "Offchain",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoresState {
    Final,
    #[default]
    Pending,
    Invalid,
    #[serde(other)]
    Unknown,
}

impl ScoresState {
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final)
    }
}

/// Opaque upstream metadata. Known keys are typed, everything else rides in
/// `extra` untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProposalMetadata {
    #[serde(default)]
    pub vote_type: Option<VoteType>,
    #[serde(default)]
    pub hidden_vote: bool,
    #[serde(default)]
    pub scores_state: ScoresState,
    /// Governor-specific override of the quorum-counted choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quorum_choices: Option<BTreeSet<usize>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub source: ProposalSource,
    pub choices: Vec<String>,
    pub quorum: Option<f64>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub metadata: ProposalMetadata,
}

impl Proposal {
    #[must_use]
    pub fn vote_type(&self) -> VoteType {
        self.metadata.vote_type.unwrap_or_default()
    }

    #[must_use]
    pub fn is_basic_vote(&self) -> bool {
        self.vote_type() == VoteType::Basic
    }

    /// Shielded proposals keep their breakdown private until scores are final.
    #[must_use]
    pub fn breakdown_hidden(&self) -> bool {
        self.metadata.hidden_vote && !self.metadata.scores_state.is_final()
    }

    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_at
    }

    #[must_use]
    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.has_started(now) && now <= self.end_at
    }
}
