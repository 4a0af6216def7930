// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyVoteBucket {
    pub date: NaiveDate,
    pub total_voting_power: f64,
    pub count: u64,
    pub last_vote_time: DateTime<Utc>,
    pub choice_power: BTreeMap<usize, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyPostBucket {
    pub date: NaiveDate,
    pub count: u64,
    pub last_post_time: DateTime<Utc>,
}

/// Day-keyed buckets that iterate in the order their day was first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBuckets<B> {
    buckets: Vec<B>,
    index: BTreeMap<NaiveDate, usize>,
}

impl<B> Default for DailyBuckets<B> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
            index: BTreeMap::new(),
        }
    }
}

impl<B> DailyBuckets<B> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_or_insert_with(&mut self, date: NaiveDate, init: impl FnOnce() -> B) -> &mut B {
        let slot = match self.index.get(&date) {
            Some(slot) => *slot,
            None => {
                self.buckets.push(init());
                let slot = self.buckets.len() - 1;
                self.index.insert(date, slot);
                slot
            }
        };
        &mut self.buckets[slot]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, B> {
        self.buckets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<B> {
        self.buckets
    }
}

impl<B> IntoIterator for DailyBuckets<B> {
    type Item = B;
    type IntoIter = std::vec::IntoIter<B>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

impl<'a, B> IntoIterator for &'a DailyBuckets<B> {
    type Item = &'a B;
    type IntoIter = std::slice::Iter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

/// Axis maximum across bucket totals, floored at zero.
#[must_use]
pub fn max_volume<I>(totals: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    totals
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max)
}
