// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use bijux_agora_model::{Proposal, TimeSeriesPoint, Vote, TOTAL_SERIES_KEY};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::ranked::{final_round_tallies, runoff_rounds, Ballot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesMode {
    /// Running per-choice sums.
    Cumulative,
    /// Instant-runoff result of every vote cast so far, per tick.
    RankedTick,
    /// Running total only; used while a breakdown is hidden.
    TotalOnly,
}

/// Ascending series from `start_at`. The last known values are repeated at
/// `end_at` when voting stopped before the proposal closed. With
/// `hourly` only the last point of each clock hour survives.
#[must_use]
pub fn build_time_series(
    proposal: &Proposal,
    votes: &[Vote],
    mode: SeriesMode,
    hourly: bool,
) -> Vec<TimeSeriesPoint> {
    let choice_count = proposal.choices.len();
    let mut ordered: Vec<&Vote> = votes.iter().filter(|v| v.has_usable_power()).collect();
    ordered.sort_by_key(|v| v.created_at);

    let mut ticks: Vec<(DateTime<Utc>, usize)> = ordered
        .iter()
        .enumerate()
        .map(|(i, vote)| (vote.created_at.max(proposal.start_at), i + 1))
        .collect();
    if hourly {
        ticks = keep_last_per_hour(ticks);
    }

    let mut points = Vec::with_capacity(ticks.len() + 2);
    points.push(TimeSeriesPoint {
        timestamp: proposal.start_at,
        values: zero_values(mode, choice_count),
    });

    let ballots: Vec<Ballot> = if mode == SeriesMode::RankedTick {
        ordered
            .iter()
            .map(|vote| Ballot::from_vote(vote, choice_count))
            .collect()
    } else {
        Vec::new()
    };

    let mut running = vec![0.0_f64; choice_count];
    let mut running_total = 0.0_f64;
    let mut consumed = 0;
    for (timestamp, prefix) in ticks {
        let values = match mode {
            SeriesMode::Cumulative => {
                for vote in &ordered[consumed..prefix] {
                    for choice in &vote.choice {
                        if let Some(slot) = choice.slot(choice_count) {
                            let proportional = vote.proportional_power(choice.weight);
                            if proportional.is_finite() && proportional > 0.0 {
                                running[slot] += proportional;
                            }
                        }
                    }
                }
                per_choice_values(running.iter().copied().enumerate())
            }
            SeriesMode::RankedTick => {
                let rounds = runoff_rounds(choice_count, &ballots[..prefix]);
                per_choice_values(final_round_tallies(choice_count, &rounds).into_iter())
            }
            SeriesMode::TotalOnly => {
                running_total += ordered[consumed..prefix]
                    .iter()
                    .map(|v| v.voting_power)
                    .sum::<f64>();
                BTreeMap::from([(TOTAL_SERIES_KEY.to_string(), running_total)])
            }
        };
        consumed = prefix;
        points.push(TimeSeriesPoint { timestamp, values });
    }

    if let Some(last) = points.last() {
        if last.timestamp < proposal.end_at {
            let values = last.values.clone();
            points.push(TimeSeriesPoint {
                timestamp: proposal.end_at,
                values,
            });
        }
    }
    points
}

fn zero_values(mode: SeriesMode, choice_count: usize) -> BTreeMap<String, f64> {
    match mode {
        SeriesMode::TotalOnly => BTreeMap::from([(TOTAL_SERIES_KEY.to_string(), 0.0)]),
        SeriesMode::Cumulative | SeriesMode::RankedTick => {
            per_choice_values((0..choice_count).map(|slot| (slot, 0.0)))
        }
    }
}

fn per_choice_values<I>(values: I) -> BTreeMap<String, f64>
where
    I: Iterator<Item = (usize, f64)>,
{
    values.map(|(slot, power)| (slot.to_string(), power)).collect()
}

fn keep_last_per_hour(ticks: Vec<(DateTime<Utc>, usize)>) -> Vec<(DateTime<Utc>, usize)> {
    let mut out: Vec<(DateTime<Utc>, usize)> = Vec::with_capacity(ticks.len());
    let mut last_hour: Option<DateTime<Utc>> = None;
    for (timestamp, prefix) in ticks {
        let hour = timestamp
            .duration_trunc(TimeDelta::hours(1))
            .unwrap_or(timestamp);
        if last_hour == Some(hour) {
            if let Some(last) = out.last_mut() {
                *last = (timestamp, prefix);
            }
        } else {
            out.push((timestamp, prefix));
            last_hour = Some(hour);
        }
    }
    out
}
