// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, BTreeSet};

use bijux_agora_core::ProposalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::proposal::{ScoresState, VoteType};
use crate::vote::Vote;

/// Series key used instead of per-choice keys while a breakdown is hidden.
pub const TOTAL_SERIES_KEY: &str = "total";

/// Inputs owned by the governance-rules collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GovernanceInputs {
    pub quorum_choices: BTreeSet<usize>,
    pub total_delegated_vp: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResultsOptions {
    pub with_votes: bool,
    pub with_timeseries: bool,
    pub aggregated_votes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedRound {
    pub round: usize,
    pub tallies: BTreeMap<usize, f64>,
    /// Power of ballots with no remaining choice.
    pub exhausted_power: f64,
    pub eliminated: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessedResults {
    pub proposal_id: ProposalId,
    pub choices: Vec<String>,
    pub total_voting_power: f64,
    pub final_results: BTreeMap<usize, f64>,
    pub choice_colors: Vec<String>,
    pub quorum: Option<f64>,
    pub quorum_choices: BTreeSet<usize>,
    pub quorum_voting_power: Option<f64>,
    pub quorum_reached: Option<bool>,
    pub total_delegated_vp: Option<f64>,
    pub vote_type: VoteType,
    pub hidden_vote: bool,
    pub scores_state: ScoresState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_series_data: Option<Vec<TimeSeriesPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranked_rounds: Option<Vec<RankedRound>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<Vec<Vote>>,
}

impl ProcessedResults {
    /// True when the per-choice breakdown was withheld.
    #[must_use]
    pub fn breakdown_hidden(&self) -> bool {
        self.hidden_vote && !self.scores_state.is_final()
    }
}
