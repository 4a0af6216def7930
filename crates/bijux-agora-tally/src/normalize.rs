// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use bijux_agora_model::{voter_key, Vote};

/// Keeps one vote per voter: the one with the latest `created_at`. On equal
/// timestamps the earlier input wins. Output follows first-appearance order
/// of each voter.
#[must_use]
pub fn dedupe_latest_votes(votes: &[Vote]) -> Vec<Vote> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(votes.len());
    let mut kept: Vec<&Vote> = Vec::with_capacity(votes.len());
    for vote in votes {
        let key = voter_key(&vote.voter_address);
        match slots.get(&key).copied() {
            Some(slot) => {
                if vote.created_at > kept[slot].created_at {
                    kept[slot] = vote;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(vote);
            }
        }
    }
    kept.into_iter().cloned().collect()
}
