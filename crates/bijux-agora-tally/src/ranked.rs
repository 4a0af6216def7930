// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use bijux_agora_model::{RankedRound, Vote};

/// One voter's ranking, parsed once and reused across runoff passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Ballot {
    power: f64,
    ranking: Vec<usize>,
}

impl Ballot {
    /// Keeps in-range choices in rank order; repeated choices count once.
    #[must_use]
    pub fn from_vote(vote: &Vote, choice_count: usize) -> Self {
        let mut ranking: Vec<usize> = Vec::with_capacity(vote.choice.len());
        for slot in vote.choice.iter().filter_map(|c| c.slot(choice_count)) {
            if !ranking.contains(&slot) {
                ranking.push(slot);
            }
        }
        Self {
            power: vote.voting_power,
            ranking,
        }
    }
}

/// Instant-runoff over ballots whose choice list is read in rank order.
#[must_use]
pub fn instant_runoff<'a, I>(choice_count: usize, votes: I) -> Vec<RankedRound>
where
    I: IntoIterator<Item = &'a Vote>,
{
    let ballots: Vec<Ballot> = votes
        .into_iter()
        .filter(|vote| vote.has_usable_power())
        .map(|vote| Ballot::from_vote(vote, choice_count))
        .collect();
    runoff_rounds(choice_count, &ballots)
}

/// Each round counts every ballot toward its highest-ranked remaining
/// choice. Counting stops once a choice holds a strict majority of the
/// active power or a single choice remains; otherwise the lowest tally is
/// eliminated (highest index on ties).
#[must_use]
pub fn runoff_rounds(choice_count: usize, ballots: &[Ballot]) -> Vec<RankedRound> {
    if choice_count == 0 {
        return Vec::new();
    }
    let mut active = vec![true; choice_count];
    let mut remaining = choice_count;
    let mut rounds = Vec::new();
    loop {
        let mut counts = vec![0.0_f64; choice_count];
        let mut exhausted_power = 0.0;
        for ballot in ballots {
            match ballot.ranking.iter().find(|slot| active[**slot]) {
                Some(slot) => counts[*slot] += ballot.power,
                None => exhausted_power += ballot.power,
            }
        }
        let tallies: BTreeMap<usize, f64> = counts
            .iter()
            .enumerate()
            .filter(|(slot, _)| active[*slot])
            .map(|(slot, power)| (slot, *power))
            .collect();
        let active_power: f64 = tallies.values().sum();
        let leader = tallies.values().copied().fold(0.0_f64, f64::max);
        let settled = remaining <= 1 || active_power <= 0.0 || leader * 2.0 > active_power;

        let eliminated = if settled {
            None
        } else {
            tallies
                .iter()
                .min_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(slot, _)| *slot)
        };
        rounds.push(RankedRound {
            round: rounds.len() + 1,
            tallies,
            exhausted_power,
            eliminated,
        });
        match eliminated {
            Some(slot) => {
                active[slot] = false;
                remaining -= 1;
            }
            None => break,
        }
    }
    rounds
}

/// Tallies of the deciding round, with eliminated choices reported as zero.
#[must_use]
pub fn final_round_tallies(choice_count: usize, rounds: &[RankedRound]) -> BTreeMap<usize, f64> {
    let mut out: BTreeMap<usize, f64> = (0..choice_count).map(|c| (c, 0.0)).collect();
    if let Some(last) = rounds.last() {
        for (slot, power) in &last.tallies {
            out.insert(*slot, *power);
        }
    }
    out
}
