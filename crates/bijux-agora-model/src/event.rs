// SPDX-License-Identifier: Apache-2.0

use bijux_agora_core::ProposalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::results::ProcessedResults;
use crate::segment::VoteSegments;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MilestoneEvent {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentsVolumeEvent {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub volume: u64,
    pub max_volume: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct VotesVolumeMetadata {
    pub voting_power: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VotesVolumeEvent {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Power per choice index for the bucket.
    pub volumes: Vec<f64>,
    pub colors: Vec<String>,
    pub max_volume: f64,
    pub metadata: VotesVolumeMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultEvent {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub proposal_id: ProposalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub result: ProcessedResults,
    pub vote_segments: VoteSegments,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    Basic(MilestoneEvent),
    Discussion(MilestoneEvent),
    Onchain(MilestoneEvent),
    Offchain(MilestoneEvent),
    CommentsVolume(CommentsVolumeEvent),
    VotesVolume(VotesVolumeEvent),
    ResultOngoingBasic(ResultEvent),
    ResultOngoingOther(ResultEvent),
    ResultEndedBasic(ResultEvent),
    ResultEndedOther(ResultEvent),
}

impl FeedEvent {
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Basic(e) | Self::Discussion(e) | Self::Onchain(e) | Self::Offchain(e) => {
                e.timestamp
            }
            Self::CommentsVolume(e) => e.timestamp,
            Self::VotesVolume(e) => e.timestamp,
            Self::ResultOngoingBasic(e)
            | Self::ResultOngoingOther(e)
            | Self::ResultEndedBasic(e)
            | Self::ResultEndedOther(e) => e.timestamp,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Basic(e) | Self::Discussion(e) | Self::Onchain(e) | Self::Offchain(e) => {
                &e.content
            }
            Self::CommentsVolume(e) => &e.content,
            Self::VotesVolume(e) => &e.content,
            Self::ResultOngoingBasic(e)
            | Self::ResultOngoingOther(e)
            | Self::ResultEndedBasic(e)
            | Self::ResultEndedOther(e) => &e.content,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Discussion(_) => "discussion",
            Self::Onchain(_) => "onchain",
            Self::Offchain(_) => "offchain",
            Self::CommentsVolume(_) => "comments_volume",
            Self::VotesVolume(_) => "votes_volume",
            Self::ResultOngoingBasic(_) => "result_ongoing_basic",
            Self::ResultOngoingOther(_) => "result_ongoing_other",
            Self::ResultEndedBasic(_) => "result_ended_basic",
            Self::ResultEndedOther(_) => "result_ended_other",
        }
    }

    #[must_use]
    pub const fn is_volume(&self) -> bool {
        matches!(self, Self::CommentsVolume(_) | Self::VotesVolume(_))
    }

    #[must_use]
    pub const fn is_result(&self) -> bool {
        matches!(
            self,
            Self::ResultOngoingBasic(_)
                | Self::ResultOngoingOther(_)
                | Self::ResultEndedBasic(_)
                | Self::ResultEndedOther(_)
        )
    }

    /// Summed activity this event stands for: comment count or total
    /// per-choice voting power. Zero for non-volume events.
    #[must_use]
    pub fn volume_total(&self) -> f64 {
        match self {
            Self::CommentsVolume(e) => e.volume as f64,
            Self::VotesVolume(e) => e.volumes.iter().sum(),
            _ => 0.0,
        }
    }
}
