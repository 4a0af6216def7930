// SPDX-License-Identifier: Apache-2.0

use bijux_agora_core::EngineConfig;
use bijux_agora_model::{
    FeedEvent, FeedFilter, FromFilter, GovernanceInputs, GroupAuthor, Post, Proposal,
    ResultsOptions, Topic, Vote,
};
use bijux_agora_tally::{
    dedupe_latest_votes, DailyVolumeBucketer, ResultsAggregator, SegmentBucketer,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::filtering::{filter_posts, filter_votes, live_post_count};
use crate::fragments;
use crate::summary::summary_event;

/// Caller-chosen view of a group timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TimelineRequest {
    pub feed: FeedFilter,
    pub from: FromFilter,
    /// Only result snapshots; used for compact previews.
    pub results_only: bool,
}

/// A proposal with everything fetched for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalActivity {
    pub proposal: Proposal,
    /// Raw votes; deduplicated during assembly.
    pub votes: Vec<Vote>,
    pub inputs: GovernanceInputs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicActivity {
    pub topic: Topic,
    pub posts: Vec<Post>,
}

/// Merges per-item fragments into one newest-first timeline.
#[derive(Debug, Clone)]
pub struct TimelineAssembler {
    results: ResultsAggregator,
    segments: SegmentBucketer,
    daily: DailyVolumeBucketer,
    summary_enabled: bool,
}

impl Default for TimelineAssembler {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl TimelineAssembler {
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            results: ResultsAggregator::from_config(config),
            segments: SegmentBucketer::from_config(config),
            daily: DailyVolumeBucketer::from_config(config),
            summary_enabled: config.summary_enabled,
        }
    }

    #[must_use]
    pub fn assemble(
        &self,
        author: &GroupAuthor,
        proposals: &[ProposalActivity],
        topics: &[TopicActivity],
        request: TimelineRequest,
        now: DateTime<Utc>,
    ) -> Vec<FeedEvent> {
        let mut events = Vec::new();
        let mut raw_votes = 0_usize;
        let mut raw_comments = 0_usize;

        for activity in proposals {
            let votes = dedupe_latest_votes(&activity.votes);
            raw_votes += votes.len();
            events.extend(self.proposal_events(activity, &votes, author, request, now));
        }
        for activity in topics {
            raw_comments += live_post_count(&activity.posts);
            events.extend(self.topic_events(activity, author, request));
        }

        events.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

        if request.results_only {
            events.retain(FeedEvent::is_result);
            return events;
        }
        if self.summary_enabled && events.first().is_some_and(FeedEvent::is_volume) {
            events.insert(0, summary_event(raw_comments, raw_votes, now));
        }
        debug!(
            proposals = proposals.len(),
            topics = topics.len(),
            raw_votes,
            raw_comments,
            events = events.len(),
            "timeline assembled"
        );
        events
    }

    /// Start, result snapshot and daily vote volume for one proposal.
    /// `votes` must already be deduplicated.
    #[must_use]
    pub fn proposal_events(
        &self,
        activity: &ProposalActivity,
        votes: &[Vote],
        author: &GroupAuthor,
        request: TimelineRequest,
        now: DateTime<Utc>,
    ) -> Vec<FeedEvent> {
        let proposal = &activity.proposal;
        let mut events = vec![fragments::proposal_started(proposal)];

        let result = self.results.aggregate(
            proposal,
            votes,
            &activity.inputs,
            ResultsOptions::default(),
        );
        let hidden = result.breakdown_hidden();

        if request.feed.includes_votes() {
            let shown = filter_votes(votes, request.from, author);
            let buckets = self.daily.bucket_votes(&shown, proposal.choices.len());
            events.extend(fragments::votes_volume(
                &buckets,
                proposal.choices.len(),
                &result.choice_colors,
                hidden,
            ));
        }

        let segments = if hidden {
            self.segments.bucket(proposal, 0.0, &[])
        } else {
            self.segments
                .bucket(proposal, result.total_voting_power, votes)
        };
        events.extend(fragments::proposal_result(proposal, result, segments, now));
        events
    }

    #[must_use]
    pub fn topic_events(
        &self,
        activity: &TopicActivity,
        author: &GroupAuthor,
        request: TimelineRequest,
    ) -> Vec<FeedEvent> {
        let mut events = vec![fragments::discussion_started(&activity.topic)];
        if request.feed.includes_comments() {
            let shown = filter_posts(&activity.posts, request.from, author);
            let buckets = self.daily.bucket_posts(&shown);
            events.extend(fragments::comments_volume(&buckets));
        }
        events
    }
}
