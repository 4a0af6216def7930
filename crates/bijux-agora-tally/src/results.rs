// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, BTreeSet};

use bijux_agora_core::EngineConfig;
use bijux_agora_model::{
    GovernanceInputs, ProcessedResults, Proposal, ResultsOptions, Vote, VoteChoice, VoteType,
};
use tracing::warn;

use crate::colors::choice_colors;
use crate::ranked::instant_runoff;
use crate::timeseries::{build_time_series, SeriesMode};

/// Per-choice tallies for one proposal.
///
/// Quorum-counted choices and the delegated voting power at start come from
/// the governance-rules collaborator through [`GovernanceInputs`]; this type
/// only applies them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsAggregator {
    neutral_color: String,
}

impl Default for ResultsAggregator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ResultsAggregator {
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            neutral_color: config.neutral_color.clone(),
        }
    }

    /// `votes` must already be deduplicated per voter.
    #[must_use]
    pub fn aggregate(
        &self,
        proposal: &Proposal,
        votes: &[Vote],
        inputs: &GovernanceInputs,
        options: ResultsOptions,
    ) -> ProcessedResults {
        let usable: Vec<Vote> = votes
            .iter()
            .filter(|vote| {
                let ok = vote.has_usable_power();
                if !ok {
                    warn!(
                        proposal_id = %proposal.id,
                        voter = %vote.voter_address,
                        voting_power = vote.voting_power,
                        "vote carries unusable voting power; skipping"
                    );
                }
                ok
            })
            .cloned()
            .collect();
        let total_voting_power: f64 = usable.iter().map(|v| v.voting_power).sum();

        if proposal.breakdown_hidden() {
            return self.hidden_results(proposal, &usable, total_voting_power, inputs, options);
        }

        let choice_count = proposal.choices.len();
        let colors = choice_colors(&proposal.choices);
        let final_results = tally_choices(proposal, &usable);

        let quorum_choices: BTreeSet<usize> = proposal
            .metadata
            .quorum_choices
            .as_ref()
            .unwrap_or(&inputs.quorum_choices)
            .iter()
            .copied()
            .filter(|slot| *slot < choice_count)
            .collect();
        let quorum_voting_power: f64 = quorum_choices
            .iter()
            .filter_map(|slot| final_results.get(slot))
            .sum();
        let quorum_reached = proposal.quorum.map(|quorum| quorum_voting_power >= quorum);

        let vote_type = proposal.vote_type();
        let ranked_rounds = (vote_type == VoteType::RankedChoice)
            .then(|| instant_runoff(choice_count, &usable));

        let time_series_data = options.with_timeseries.then(|| {
            let mode = if vote_type == VoteType::RankedChoice {
                SeriesMode::RankedTick
            } else {
                SeriesMode::Cumulative
            };
            build_time_series(proposal, &usable, mode, options.aggregated_votes)
        });

        let votes = options
            .with_votes
            .then(|| decorate_votes(&usable, &proposal.choices, &colors));

        ProcessedResults {
            proposal_id: proposal.id.clone(),
            choices: proposal.choices.clone(),
            total_voting_power,
            final_results,
            choice_colors: colors,
            quorum: proposal.quorum,
            quorum_choices,
            quorum_voting_power: Some(quorum_voting_power),
            quorum_reached,
            total_delegated_vp: inputs.total_delegated_vp,
            vote_type,
            hidden_vote: proposal.metadata.hidden_vote,
            scores_state: proposal.metadata.scores_state.clone(),
            time_series_data,
            ranked_rounds,
            votes,
        }
    }

    /// Shielded results: the breakdown is never computed, only the total and
    /// the neutral color leave this function.
    fn hidden_results(
        &self,
        proposal: &Proposal,
        usable: &[Vote],
        total_voting_power: f64,
        inputs: &GovernanceInputs,
        options: ResultsOptions,
    ) -> ProcessedResults {
        let time_series_data = options.with_timeseries.then(|| {
            build_time_series(
                proposal,
                usable,
                SeriesMode::TotalOnly,
                options.aggregated_votes,
            )
        });
        let votes = options.with_votes.then(|| {
            let mut redacted: Vec<Vote> = usable
                .iter()
                .map(|vote| Vote {
                    choice: Vec::new(),
                    ..vote.clone()
                })
                .collect();
            redacted.sort_by(|a, b| b.voting_power.total_cmp(&a.voting_power));
            redacted
        });

        ProcessedResults {
            proposal_id: proposal.id.clone(),
            choices: proposal.choices.clone(),
            total_voting_power,
            final_results: BTreeMap::new(),
            choice_colors: vec![self.neutral_color.clone()],
            quorum: proposal.quorum,
            quorum_choices: BTreeSet::new(),
            quorum_voting_power: None,
            quorum_reached: None,
            total_delegated_vp: inputs.total_delegated_vp,
            vote_type: proposal.vote_type(),
            hidden_vote: true,
            scores_state: proposal.metadata.scores_state.clone(),
            time_series_data,
            ranked_rounds: None,
            votes,
        }
    }
}

/// Sum of proportional power per choice; every choice gets an entry.
fn tally_choices(proposal: &Proposal, votes: &[Vote]) -> BTreeMap<usize, f64> {
    let choice_count = proposal.choices.len();
    let mut results: BTreeMap<usize, f64> = (0..choice_count).map(|slot| (slot, 0.0)).collect();
    for vote in votes {
        for choice in &vote.choice {
            let Some(slot) = choice.slot(choice_count) else {
                warn!(
                    proposal_id = %proposal.id,
                    voter = %vote.voter_address,
                    choice_index = choice.choice_index,
                    choice_count,
                    "vote references a choice outside the proposal; skipping"
                );
                continue;
            };
            let proportional = vote.proportional_power(choice.weight);
            if proportional.is_finite() && proportional > 0.0 {
                *results.entry(slot).or_insert(0.0) += proportional;
            }
        }
    }
    results
}

/// Resolves choice text and color for display, heaviest voters first.
fn decorate_votes(votes: &[Vote], choices: &[String], colors: &[String]) -> Vec<Vote> {
    let mut decorated: Vec<Vote> = votes
        .iter()
        .map(|vote| Vote {
            choice: vote
                .choice
                .iter()
                .filter_map(|choice| {
                    let slot = choice.slot(choices.len())?;
                    Some(VoteChoice {
                        choice_index: choice.choice_index,
                        weight: choice.weight,
                        color: colors[slot].clone(),
                        text: choices[slot].clone(),
                    })
                })
                .collect(),
            ..vote.clone()
        })
        .collect();
    decorated.sort_by(|a, b| b.voting_power.total_cmp(&a.voting_power));
    decorated
}

#[cfg(test)]
mod tests {
    use super::*;
    use bijux_agora_core::ProposalId;
    use bijux_agora_model::{ProposalMetadata, ProposalSource, ScoresState, TOTAL_SERIES_KEY};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn proposal(metadata: ProposalMetadata, quorum: Option<f64>) -> Proposal {
        Proposal {
            id: ProposalId::new("prop-7").expect("id"),
            title: "Fund grants".to_string(),
            source: ProposalSource::Onchain,
            choices: vec!["For".to_string(), "Against".to_string(), "Abstain".to_string()],
            quorum,
            start_at: at(1, 0),
            end_at: at(5, 0),
            url: None,
            metadata,
        }
    }

    fn vote(voter: &str, power: f64, choices: &[(i64, f64)], hour: u32) -> Vote {
        Vote::new(
            voter,
            power,
            choices
                .iter()
                .map(|(idx, weight)| VoteChoice::new(*idx, *weight))
                .collect(),
            at(2, hour),
        )
    }

    fn inputs(quorum_choices: &[usize]) -> GovernanceInputs {
        GovernanceInputs {
            quorum_choices: quorum_choices.iter().copied().collect(),
            total_delegated_vp: Some(10_000.0),
        }
    }

    #[test]
    fn tallies_weighted_and_approval_votes_by_proportional_power() {
        let votes = vec![
            vote("0xa", 100.0, &[(0, 60.0), (1, 40.0)], 1),
            vote("0xb", 50.0, &[(0, 100.0), (2, 100.0)], 2),
        ];
        let results = ResultsAggregator::default().aggregate(
            &proposal(ProposalMetadata::default(), Some(100.0)),
            &votes,
            &inputs(&[0, 2]),
            ResultsOptions::default(),
        );
        assert_eq!(results.total_voting_power, 150.0);
        assert_eq!(results.final_results[&0], 110.0);
        assert_eq!(results.final_results[&1], 40.0);
        assert_eq!(results.final_results[&2], 50.0);
        assert_eq!(results.quorum_voting_power, Some(160.0));
        assert_eq!(results.quorum_reached, Some(true));
        assert_eq!(results.total_delegated_vp, Some(10_000.0));
        assert_eq!(results.choice_colors.len(), 3);
        assert!(results.votes.is_none());
        assert!(results.time_series_data.is_none());
    }

    #[test]
    fn metadata_quorum_choices_override_injected_set() {
        let metadata = ProposalMetadata {
            quorum_choices: Some([1].into_iter().collect()),
            ..ProposalMetadata::default()
        };
        let votes = vec![vote("0xa", 10.0, &[(1, 100.0)], 1)];
        let results = ResultsAggregator::default().aggregate(
            &proposal(metadata, Some(20.0)),
            &votes,
            &inputs(&[0]),
            ResultsOptions::default(),
        );
        assert_eq!(results.quorum_voting_power, Some(10.0));
        assert_eq!(results.quorum_reached, Some(false));
    }

    #[test]
    fn null_quorum_leaves_quorum_reached_unset() {
        let results = ResultsAggregator::default().aggregate(
            &proposal(ProposalMetadata::default(), None),
            &[],
            &inputs(&[0]),
            ResultsOptions::default(),
        );
        assert_eq!(results.quorum_reached, None);
        assert_eq!(results.total_voting_power, 0.0);
        assert_eq!(results.final_results.len(), 3);
    }

    #[test]
    fn hidden_votes_never_expose_breakdown_regardless_of_options() {
        let metadata = ProposalMetadata {
            hidden_vote: true,
            scores_state: ScoresState::Pending,
            ..ProposalMetadata::default()
        };
        let votes = vec![
            vote("0xa", 70.0, &[(0, 100.0)], 1),
            vote("0xb", 30.0, &[(1, 100.0)], 2),
        ];
        let results = ResultsAggregator::default().aggregate(
            &proposal(metadata, Some(10.0)),
            &votes,
            &inputs(&[0, 1]),
            ResultsOptions {
                with_votes: true,
                with_timeseries: true,
                aggregated_votes: false,
            },
        );
        assert_eq!(results.total_voting_power, 100.0);
        assert!(results.final_results.is_empty());
        assert_eq!(results.choice_colors, vec!["#737373".to_string()]);
        assert_eq!(results.quorum_voting_power, None);
        assert!(results
            .votes
            .as_ref()
            .expect("votes")
            .iter()
            .all(|v| v.choice.is_empty()));
        let series = results.time_series_data.as_ref().expect("series");
        assert!(series
            .iter()
            .all(|p| p.values.keys().all(|k| k == TOTAL_SERIES_KEY)));
    }

    #[test]
    fn hidden_votes_are_revealed_once_final() {
        let metadata = ProposalMetadata {
            hidden_vote: true,
            scores_state: ScoresState::Final,
            ..ProposalMetadata::default()
        };
        let votes = vec![vote("0xa", 70.0, &[(0, 100.0)], 1)];
        let results = ResultsAggregator::default().aggregate(
            &proposal(metadata, None),
            &votes,
            &inputs(&[]),
            ResultsOptions::default(),
        );
        assert_eq!(results.final_results[&0], 70.0);
        assert_eq!(results.choice_colors.len(), 3);
    }

    #[test]
    fn decorated_votes_resolve_text_and_color_heaviest_first() {
        let votes = vec![
            vote("0xa", 5.0, &[(1, 100.0)], 1),
            vote("0xb", 9.0, &[(0, 100.0), (9, 100.0)], 2),
        ];
        let results = ResultsAggregator::default().aggregate(
            &proposal(ProposalMetadata::default(), None),
            &votes,
            &inputs(&[]),
            ResultsOptions {
                with_votes: true,
                ..ResultsOptions::default()
            },
        );
        let decorated = results.votes.expect("votes");
        assert_eq!(decorated[0].voter_address, "0xb");
        assert_eq!(decorated[0].choice.len(), 1);
        assert_eq!(decorated[0].choice[0].text, "For");
        assert_eq!(decorated[0].choice[0].color, crate::colors::FOR_COLOR);
        assert_eq!(decorated[1].choice[0].text, "Against");
    }

    #[test]
    fn ranked_choice_exposes_runoff_rounds() {
        let metadata = ProposalMetadata {
            vote_type: Some(VoteType::RankedChoice),
            ..ProposalMetadata::default()
        };
        let votes = vec![
            vote("0xa", 40.0, &[(0, 100.0)], 1),
            vote("0xb", 35.0, &[(1, 100.0), (2, 100.0)], 2),
            vote("0xc", 25.0, &[(2, 100.0), (1, 100.0)], 3),
        ];
        let results = ResultsAggregator::default().aggregate(
            &proposal(metadata, None),
            &votes,
            &inputs(&[]),
            ResultsOptions {
                with_timeseries: true,
                ..ResultsOptions::default()
            },
        );
        let rounds = results.ranked_rounds.expect("rounds");
        assert_eq!(rounds.len(), 2);
        let series = results.time_series_data.expect("series");
        let last = series.last().expect("point");
        assert_eq!(last.timestamp, at(5, 0));
        assert_eq!(last.values["1"], 60.0);
        assert_eq!(last.values["2"], 0.0);
    }
}
