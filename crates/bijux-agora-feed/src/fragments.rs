// SPDX-License-Identifier: Apache-2.0

use bijux_agora_model::{
    max_volume, CommentsVolumeEvent, DailyBuckets, DailyPostBucket, DailyVoteBucket, FeedEvent,
    MilestoneEvent, ProcessedResults, Proposal, ProposalSource, ResultEvent, Topic,
    VoteSegments, VotesVolumeEvent, VotesVolumeMetadata,
};
use chrono::{DateTime, Utc};

pub const DISCUSSION_STARTED: &str = "Discussion started";

pub(crate) fn proposal_started(proposal: &Proposal) -> FeedEvent {
    let event = MilestoneEvent {
        content: format!("{} vote started", proposal.source.label()),
        timestamp: proposal.start_at,
        url: proposal.url.clone(),
    };
    match proposal.source {
        ProposalSource::Onchain => FeedEvent::Onchain(event),
        ProposalSource::Offchain => FeedEvent::Offchain(event),
    }
}

/// Results snapshot for a proposal that has started: stamped `now` while
/// voting is open, `end_at` once it closed.
pub(crate) fn proposal_result(
    proposal: &Proposal,
    result: ProcessedResults,
    vote_segments: VoteSegments,
    now: DateTime<Utc>,
) -> Option<FeedEvent> {
    if !proposal.has_started(now) {
        return None;
    }
    let ongoing = proposal.is_ongoing(now);
    let event = ResultEvent {
        content: format!(
            "{} vote {}",
            proposal.source.label(),
            if ongoing { "ongoing" } else { "ended" }
        ),
        timestamp: if ongoing { now } else { proposal.end_at },
        proposal_id: proposal.id.clone(),
        url: proposal.url.clone(),
        result,
        vote_segments,
    };
    Some(match (ongoing, proposal.is_basic_vote()) {
        (true, true) => FeedEvent::ResultOngoingBasic(event),
        (true, false) => FeedEvent::ResultOngoingOther(event),
        (false, true) => FeedEvent::ResultEndedBasic(event),
        (false, false) => FeedEvent::ResultEndedOther(event),
    })
}

/// One event per day with votes. A hidden breakdown collapses `volumes`
/// to the day's total.
pub(crate) fn votes_volume(
    buckets: &DailyBuckets<DailyVoteBucket>,
    choice_count: usize,
    colors: &[String],
    breakdown_hidden: bool,
) -> Vec<FeedEvent> {
    let max = max_volume(buckets.iter().map(|b| b.total_voting_power));
    buckets
        .iter()
        .filter(|bucket| bucket.count > 0)
        .map(|bucket| {
            let volumes = if breakdown_hidden {
                vec![bucket.total_voting_power]
            } else {
                (0..choice_count)
                    .map(|slot| bucket.choice_power.get(&slot).copied().unwrap_or(0.0))
                    .collect()
            };
            FeedEvent::VotesVolume(VotesVolumeEvent {
                content: counted(bucket.count, "vote"),
                timestamp: bucket.last_vote_time,
                volumes,
                colors: colors.to_vec(),
                max_volume: max,
                metadata: VotesVolumeMetadata {
                    voting_power: bucket.total_voting_power,
                },
            })
        })
        .collect()
}

pub(crate) fn discussion_started(topic: &Topic) -> FeedEvent {
    FeedEvent::Discussion(MilestoneEvent {
        content: DISCUSSION_STARTED.to_string(),
        timestamp: topic.created_at,
        url: topic.url.clone(),
    })
}

pub(crate) fn comments_volume(buckets: &DailyBuckets<DailyPostBucket>) -> Vec<FeedEvent> {
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    buckets
        .iter()
        .filter(|bucket| bucket.count > 0)
        .map(|bucket| {
            FeedEvent::CommentsVolume(CommentsVolumeEvent {
                content: counted(bucket.count, "comment"),
                timestamp: bucket.last_post_time,
                volume: bucket.count,
                max_volume: max,
            })
        })
        .collect()
}

fn counted(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
