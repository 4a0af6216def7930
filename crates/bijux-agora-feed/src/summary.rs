// SPDX-License-Identifier: Apache-2.0

use bijux_agora_model::{FeedEvent, MilestoneEvent};
use chrono::{DateTime, Utc};

pub const NO_ACTIVITY: &str = "No activity";

#[must_use]
pub fn summary_content(comments: usize, votes: usize) -> String {
    if comments == 0 && votes == 0 {
        NO_ACTIVITY.to_string()
    } else {
        format!("{comments} comments and {votes} votes")
    }
}

/// Header event placed above a timeline whose newest entry is a volume
/// event.
#[must_use]
pub fn summary_event(comments: usize, votes: usize, now: DateTime<Utc>) -> FeedEvent {
    FeedEvent::Basic(MilestoneEvent {
        content: summary_content(comments, votes),
        timestamp: now,
        url: None,
    })
}
