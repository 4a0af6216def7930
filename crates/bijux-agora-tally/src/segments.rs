// SPDX-License-Identifier: Apache-2.0

use bijux_agora_core::EngineConfig;
use bijux_agora_model::{Proposal, Vote, VoteSegment, VoteSegments};
use tracing::warn;

pub const DEFAULT_MIN_VISIBLE_WIDTH_PERCENT: f64 = 1.0;

/// Turns a vote list into a handful of bar slices per choice: votes worth at
/// least `min_visible_width_percent` of the total keep their own slice, the
/// rest collapse into one trailing aggregated slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBucketer {
    min_visible_width_percent: f64,
}

impl Default for SegmentBucketer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_VISIBLE_WIDTH_PERCENT)
    }
}

impl SegmentBucketer {
    #[must_use]
    pub const fn new(min_visible_width_percent: f64) -> Self {
        Self {
            min_visible_width_percent,
        }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.min_visible_width_percent)
    }

    #[must_use]
    pub const fn min_visible_width_percent(&self) -> f64 {
        self.min_visible_width_percent
    }

    #[must_use]
    pub fn bucket(
        &self,
        proposal: &Proposal,
        total_voting_power: f64,
        votes: &[Vote],
    ) -> VoteSegments {
        let choice_count = proposal.choices.len();
        let mut individual: Vec<Vec<VoteSegment>> = vec![Vec::new(); choice_count];
        let mut tail = vec![0.0_f64; choice_count];

        if !(total_voting_power.is_finite() && total_voting_power > 0.0) {
            return into_segment_map(individual);
        }

        let mut sorted: Vec<&Vote> = votes.iter().collect();
        sorted.sort_by(|a, b| b.voting_power.total_cmp(&a.voting_power));

        for vote in sorted {
            for choice in &vote.choice {
                let Some(slot) = choice.slot(choice_count) else {
                    warn!(
                        proposal_id = %proposal.id,
                        choice_index = choice.choice_index,
                        choice_count,
                        voter = %vote.voter_address,
                        "vote references a choice outside the proposal; skipping"
                    );
                    continue;
                };
                let proportional = vote.proportional_power(choice.weight);
                if !proportional.is_finite() || proportional <= 0.0 {
                    continue;
                }
                let percentage = proportional / total_voting_power * 100.0;
                if percentage >= self.min_visible_width_percent {
                    individual[slot].push(VoteSegment::individual(proportional));
                } else {
                    tail[slot] += proportional;
                }
            }
        }

        for (slot, power) in tail.into_iter().enumerate() {
            if power > 0.0 {
                individual[slot].push(VoteSegment::aggregated(power));
            }
        }
        into_segment_map(individual)
    }
}

fn into_segment_map(per_choice: Vec<Vec<VoteSegment>>) -> VoteSegments {
    per_choice
        .into_iter()
        .enumerate()
        .map(|(slot, segments)| (slot.to_string(), segments))
        .collect()
}
