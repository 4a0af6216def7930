// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use bijux_agora_core::{
    CachePort, ClockPort, EngineConfig, GroupId, ProposalId, Result, ResultExt,
};
use bijux_agora_model::{FeedEvent, Group, ProcessedResults, Proposal, ResultsOptions, Topic};
use bijux_agora_tally::{aggregate_volume_events, dedupe_latest_votes, ResultsAggregator};
use chrono::{DateTime, Utc};
use futures::future::{join, join_all};
use tracing::{debug, info_span, warn, Instrument};

use crate::cache::feed_cache_key;
use crate::source::{GovernanceSource, SourceErrorCode};
use crate::timeline::{ProposalActivity, TimelineAssembler, TimelineRequest, TopicActivity};

pub type FeedCache = dyn CachePort<Vec<FeedEvent>>;

/// Async entry point: fetches a group's linked items concurrently and hands
/// them to the [`TimelineAssembler`].
pub struct FeedService {
    source: Arc<dyn GovernanceSource>,
    clock: Arc<dyn ClockPort>,
    cache: Option<Arc<FeedCache>>,
    assembler: TimelineAssembler,
    results: ResultsAggregator,
    cache_ttl: Duration,
}

impl FeedService {
    #[must_use]
    pub fn new(
        source: Arc<dyn GovernanceSource>,
        clock: Arc<dyn ClockPort>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            source,
            clock,
            cache: None,
            assembler: TimelineAssembler::from_config(config),
            results: ResultsAggregator::from_config(config),
            cache_ttl: config.feed_cache_ttl,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<FeedCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Newest-first timeline of a group, or `None` when the group does not
    /// exist. Linked items that fail to load are logged and left out.
    pub async fn assemble_group_timeline(
        &self,
        group_id: &str,
        request: TimelineRequest,
    ) -> Result<Option<Vec<FeedEvent>>> {
        let group_id = GroupId::new(group_id)?;
        let now = self.clock.now();
        let span = info_span!(
            "assemble_group_timeline",
            group = %group_id,
            feed = ?request.feed,
            from = request.from.as_str(),
            results_only = request.results_only,
        );
        self.assemble(group_id, request, now).instrument(span).await
    }

    /// Timeline coarsened by [`aggregate_volume_events`] at `level`.
    pub async fn aggregated_group_timeline(
        &self,
        group_id: &str,
        request: TimelineRequest,
        level: u32,
    ) -> Result<Option<Vec<FeedEvent>>> {
        Ok(self
            .assemble_group_timeline(group_id, request)
            .await?
            .map(|events| aggregate_volume_events(&events, level)))
    }

    /// Results of one proposal in a group. Unlike timeline assembly, a
    /// failed vote fetch is an error here.
    pub async fn proposal_results(
        &self,
        group_id: &str,
        proposal_id: &str,
        options: ResultsOptions,
    ) -> Result<Option<ProcessedResults>> {
        let group_id = GroupId::new(group_id)?;
        let proposal_id = ProposalId::new(proposal_id)?;
        let Some(group) = self.load_group(&group_id).await? else {
            return Ok(None);
        };
        let Some(proposal) = group.proposals.iter().find(|p| p.id == proposal_id) else {
            return Ok(None);
        };
        let (votes, inputs) = join(
            self.source.fetch_votes(&proposal.id),
            self.source.governance_inputs(proposal),
        )
        .await;
        let votes = votes.with_context(|| format!("proposal {proposal_id}"))?;
        let inputs = inputs.with_context(|| format!("proposal {proposal_id}"))?;
        let votes = dedupe_latest_votes(&votes);
        Ok(Some(self.results.aggregate(proposal, &votes, &inputs, options)))
    }

    async fn assemble(
        &self,
        group_id: GroupId,
        request: TimelineRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<Vec<FeedEvent>>> {
        let key = feed_cache_key(&group_id, request, now)?;
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            debug!(cache = "hit", "timeline served from cache");
            return Ok(Some(hit));
        }

        let Some(group) = self.load_group(&group_id).await? else {
            debug!("group not found");
            return Ok(None);
        };
        let (proposals, topics) = join(
            join_all(group.proposals.iter().map(|p| self.load_proposal(p))),
            join_all(group.topics.iter().map(|t| self.load_topic(t))),
        )
        .await;
        let proposals: Vec<ProposalActivity> = proposals.into_iter().flatten().collect();
        let topics: Vec<TopicActivity> = topics.into_iter().flatten().collect();

        let events = self
            .assembler
            .assemble(&group.author, &proposals, &topics, request, now);
        if let Some(cache) = &self.cache {
            cache.put(key, events.clone(), self.cache_ttl);
        }
        Ok(Some(events))
    }

    async fn load_group(&self, group_id: &GroupId) -> Result<Option<Group>> {
        match self.source.fetch_group(group_id).await {
            Err(err) if err.code == SourceErrorCode::NotFound => Ok(None),
            fetched => fetched.with_context(|| format!("group {group_id}")),
        }
    }

    async fn load_proposal(&self, proposal: &Proposal) -> Option<ProposalActivity> {
        let (votes, inputs) = join(
            self.source.fetch_votes(&proposal.id),
            self.source.governance_inputs(proposal),
        )
        .await;
        match (votes, inputs) {
            (Ok(votes), Ok(inputs)) => Some(ProposalActivity {
                proposal: proposal.clone(),
                votes,
                inputs,
            }),
            (Err(error), _) | (_, Err(error)) => {
                warn!(
                    item = %format!("proposal {}", proposal.id),
                    error = %error,
                    "dropping proposal from timeline"
                );
                None
            }
        }
    }

    async fn load_topic(&self, topic: &Topic) -> Option<TopicActivity> {
        match self.source.fetch_posts(&topic.external_id).await {
            Ok(posts) => Some(TopicActivity {
                topic: topic.clone(),
                posts,
            }),
            Err(error) => {
                warn!(
                    item = %format!("topic {}", topic.external_id),
                    error = %error,
                    "dropping topic from timeline"
                );
                None
            }
        }
    }
}
