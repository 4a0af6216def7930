// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use async_trait::async_trait;
use bijux_agora_core::{ExternalId, GroupId, ProposalId};
use bijux_agora_model::{GovernanceInputs, Group, Post, Proposal, Vote};

pub mod fake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SourceErrorCode {
    NotFound,
    Unavailable,
    InvalidData,
    Internal,
}

impl SourceErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
            Self::InvalidData => "invalid_data",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    pub code: SourceErrorCode,
    pub message: String,
}

impl SourceError {
    #[must_use]
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::NotFound, message)
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Unavailable, message)
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for SourceError {}

/// Upstream collaborators the feed reads from: the proposal store, the
/// forum indexer, the delegate resolver and the governance-rules policy.
#[async_trait]
pub trait GovernanceSource: Send + Sync + 'static {
    /// `Ok(None)` when the group does not exist.
    async fn fetch_group(&self, group: &GroupId) -> Result<Option<Group>, SourceError>;
    async fn fetch_votes(&self, proposal: &ProposalId) -> Result<Vec<Vote>, SourceError>;
    /// Posts come back with `author_voting_power` already resolved.
    async fn fetch_posts(&self, topic: &ExternalId) -> Result<Vec<Post>, SourceError>;
    async fn governance_inputs(&self, proposal: &Proposal)
        -> Result<GovernanceInputs, SourceError>;
}
