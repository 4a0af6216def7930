// SPDX-License-Identifier: Apache-2.0

use bijux_agora_core::EngineConfig;
use bijux_agora_model::{DailyBuckets, DailyPostBucket, DailyVoteBucket, Post, Vote};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use tracing::debug;

/// Groups votes and posts by calendar day in a fixed local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyVolumeBucketer {
    offset: FixedOffset,
}

impl Default for DailyVolumeBucketer {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl DailyVolumeBucketer {
    /// Offsets chrono cannot represent fall back to UTC.
    #[must_use]
    pub fn new(timezone_offset_minutes: i32) -> Self {
        let offset = timezone_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.timezone_offset_minutes)
    }

    #[must_use]
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Per-day vote totals with a full-fidelity per-choice breakdown.
    #[must_use]
    pub fn bucket_votes(
        &self,
        votes: &[Vote],
        choice_count: usize,
    ) -> DailyBuckets<DailyVoteBucket> {
        let mut buckets = DailyBuckets::new();
        for vote in votes {
            if !vote.has_usable_power() {
                debug!(voter = %vote.voter_address, "skipping vote with unusable voting power");
                continue;
            }
            let date = self.day_of(vote.created_at);
            let bucket = buckets.entry_or_insert_with(date, || DailyVoteBucket {
                date,
                total_voting_power: 0.0,
                count: 0,
                last_vote_time: vote.created_at,
                choice_power: Default::default(),
            });
            bucket.total_voting_power += vote.voting_power;
            bucket.count += 1;
            if vote.created_at > bucket.last_vote_time {
                bucket.last_vote_time = vote.created_at;
            }
            for choice in &vote.choice {
                let Some(slot) = choice.slot(choice_count) else {
                    continue;
                };
                let proportional = vote.proportional_power(choice.weight);
                if proportional.is_finite() && proportional > 0.0 {
                    *bucket.choice_power.entry(slot).or_insert(0.0) += proportional;
                }
            }
        }
        buckets
    }

    #[must_use]
    pub fn bucket_posts(&self, posts: &[Post]) -> DailyBuckets<DailyPostBucket> {
        let mut buckets = DailyBuckets::new();
        for post in posts {
            let date = self.day_of(post.created_at);
            let bucket = buckets.entry_or_insert_with(date, || DailyPostBucket {
                date,
                count: 0,
                last_post_time: post.created_at,
            });
            bucket.count += 1;
            if post.created_at > bucket.last_post_time {
                bucket.last_post_time = post.created_at;
            }
        }
        buckets
    }
}
