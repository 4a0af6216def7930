// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bijux_agora_core::{ExternalId, GroupId, ProposalId};
use bijux_agora_model::{GovernanceInputs, Group, Post, Proposal, Vote};
use tokio::sync::Mutex;

use super::{GovernanceSource, SourceError};

/// In-memory source for tests and local wiring.
#[derive(Default)]
pub struct FakeSource {
    pub groups: Mutex<HashMap<GroupId, Group>>,
    pub votes: Mutex<HashMap<ProposalId, Vec<Vote>>>,
    pub posts: Mutex<HashMap<ExternalId, Vec<Post>>>,
    pub inputs: Mutex<HashMap<ProposalId, GovernanceInputs>>,
    pub failing_proposals: Mutex<HashSet<ProposalId>>,
    pub failing_topics: Mutex<HashSet<ExternalId>>,
    pub fetch_calls: AtomicU64,
    pub slow_read: Option<Duration>,
}

impl FakeSource {
    /// Every read sleeps for `delay` before answering.
    #[must_use]
    pub fn with_read_latency(mut self, delay: Duration) -> Self {
        self.slow_read = Some(delay);
        self
    }

    pub async fn insert_group(&self, group: Group) {
        self.groups.lock().await.insert(group.id.clone(), group);
    }

    pub async fn insert_votes(&self, proposal: ProposalId, votes: Vec<Vote>) {
        self.votes.lock().await.insert(proposal, votes);
    }

    pub async fn insert_posts(&self, topic: ExternalId, posts: Vec<Post>) {
        self.posts.lock().await.insert(topic, posts);
    }

    pub async fn insert_inputs(&self, proposal: ProposalId, inputs: GovernanceInputs) {
        self.inputs.lock().await.insert(proposal, inputs);
    }

    pub async fn fail_votes_for(&self, proposal: ProposalId) {
        self.failing_proposals.lock().await.insert(proposal);
    }

    pub async fn fail_posts_for(&self, topic: ExternalId) {
        self.failing_topics.lock().await.insert(topic);
    }

    #[must_use]
    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }

    async fn simulate_latency(&self) {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.slow_read {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl GovernanceSource for FakeSource {
    async fn fetch_group(&self, group: &GroupId) -> Result<Option<Group>, SourceError> {
        self.simulate_latency().await;
        Ok(self.groups.lock().await.get(group).cloned())
    }

    async fn fetch_votes(&self, proposal: &ProposalId) -> Result<Vec<Vote>, SourceError> {
        self.simulate_latency().await;
        if self.failing_proposals.lock().await.contains(proposal) {
            return Err(SourceError::unavailable(format!(
                "vote indexer unreachable for {proposal}"
            )));
        }
        Ok(self
            .votes
            .lock()
            .await
            .get(proposal)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_posts(&self, topic: &ExternalId) -> Result<Vec<Post>, SourceError> {
        self.simulate_latency().await;
        if self.failing_topics.lock().await.contains(topic) {
            return Err(SourceError::unavailable(format!(
                "forum indexer unreachable for topic {topic}"
            )));
        }
        Ok(self
            .posts
            .lock()
            .await
            .get(topic)
            .cloned()
            .unwrap_or_default())
    }

    async fn governance_inputs(
        &self,
        proposal: &Proposal,
    ) -> Result<GovernanceInputs, SourceError> {
        self.simulate_latency().await;
        Ok(self
            .inputs
            .lock()
            .await
            .get(&proposal.id)
            .cloned()
            .unwrap_or_default())
    }
}
