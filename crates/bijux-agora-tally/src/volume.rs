// SPDX-License-Identifier: Apache-2.0

use bijux_agora_model::{CommentsVolumeEvent, FeedEvent, VotesVolumeEvent};

/// Number of consecutive volume events folded into one at `level`.
///
/// `2^level` capped by the number of volume events; saturates for large
/// levels instead of overflowing.
#[must_use]
pub fn merge_count(level: u32, volume_events: usize) -> usize {
    let factor = 1_usize.checked_shl(level).unwrap_or(usize::MAX);
    factor.min(volume_events).max(1)
}

/// Coarsens a timeline by merging runs of consecutive volume events.
///
/// Non-volume events pass through untouched. The result is sorted
/// descending by timestamp, except when nothing merges (fewer than two
/// volume events or a merge count of one), in which case the input is
/// returned as is.
#[must_use]
pub fn aggregate_volume_events(events: &[FeedEvent], level: u32) -> Vec<FeedEvent> {
    let (volume, other): (Vec<&FeedEvent>, Vec<&FeedEvent>) =
        events.iter().partition(|event| event.is_volume());
    if volume.len() <= 1 {
        return events.to_vec();
    }
    let chunk_size = merge_count(level, volume.len());
    if chunk_size == 1 {
        return events.to_vec();
    }

    let mut out: Vec<FeedEvent> = other.into_iter().cloned().collect();
    for chunk in volume.chunks(chunk_size) {
        out.extend(merge_chunk(chunk));
    }
    out.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    out
}

/// At most one event per volume kind, in the order each kind first appears.
fn merge_chunk(chunk: &[&FeedEvent]) -> Vec<FeedEvent> {
    let mut comments: Option<CommentsVolumeEvent> = None;
    let mut votes: Option<VotesVolumeEvent> = None;
    let mut comments_first = None;
    for event in chunk {
        match event {
            FeedEvent::CommentsVolume(next) => {
                comments_first.get_or_insert(true);
                comments = Some(match comments.take() {
                    Some(acc) => merge_comments(acc, next),
                    None => next.clone(),
                });
            }
            FeedEvent::VotesVolume(next) => {
                comments_first.get_or_insert(false);
                votes = Some(match votes.take() {
                    Some(acc) => merge_votes(acc, next),
                    None => next.clone(),
                });
            }
            _ => {}
        }
    }
    let comments = comments.map(FeedEvent::CommentsVolume);
    let votes = votes.map(FeedEvent::VotesVolume);
    if comments_first.unwrap_or(true) {
        comments.into_iter().chain(votes).collect()
    } else {
        votes.into_iter().chain(comments).collect()
    }
}

fn merge_comments(mut acc: CommentsVolumeEvent, next: &CommentsVolumeEvent) -> CommentsVolumeEvent {
    acc.timestamp = acc.timestamp.min(next.timestamp);
    acc.volume = acc.volume.saturating_add(next.volume);
    acc.max_volume = acc.max_volume.max(next.max_volume);
    acc
}

fn merge_votes(mut acc: VotesVolumeEvent, next: &VotesVolumeEvent) -> VotesVolumeEvent {
    acc.timestamp = acc.timestamp.min(next.timestamp);
    if acc.volumes.len() < next.volumes.len() {
        acc.volumes.resize(next.volumes.len(), 0.0);
    }
    for (slot, power) in next.volumes.iter().enumerate() {
        acc.volumes[slot] += power;
    }
    acc.max_volume = acc.max_volume.max(next.max_volume);
    acc.metadata.voting_power = acc.metadata.voting_power.max(next.metadata.voting_power);
    acc
}
