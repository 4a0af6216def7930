// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bijux_agora_core::{
    CachePort, EngineConfig, ErrorCode, ExternalId, FixedClock, GroupId, ProposalId,
};
use bijux_agora_feed::{FakeSource, FeedService, HotFeedCache, TimelineRequest};
use bijux_agora_model::{
    FeedEvent, FeedFilter, FromFilter, GovernanceInputs, Group, GroupAuthor, Post, Proposal,
    ProposalMetadata, ProposalSource, ResultsOptions, ScoresState, Topic, Vote, VoteChoice,
    VoteSegment, VoteType,
};
use chrono::{DateTime, TimeZone, Utc};

const GROUP: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";
const HIDDEN_GROUP: &str = "67e55044-10b1-426f-9247-bb680e5fe0c9";

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn now() -> DateTime<Utc> {
    at(10, 12)
}

fn proposal(
    id: &str,
    source: ProposalSource,
    vote_type: VoteType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Proposal {
    Proposal {
        id: ProposalId::new(id).expect("proposal id"),
        title: format!("Proposal {id}"),
        source,
        choices: vec!["For".to_string(), "Against".to_string(), "Abstain".to_string()],
        quorum: Some(100.0),
        start_at: start,
        end_at: end,
        url: Some(format!("https://gov.example.org/{id}")),
        metadata: ProposalMetadata {
            vote_type: Some(vote_type),
            ..ProposalMetadata::default()
        },
    }
}

fn vote(voter: &str, power: f64, choices: &[(i64, f64)], when: DateTime<Utc>) -> Vote {
    Vote::new(
        voter,
        power,
        choices
            .iter()
            .map(|(idx, weight)| VoteChoice::new(*idx, *weight))
            .collect(),
        when,
    )
}

fn post(id: &str, author: &str, power: Option<f64>, deleted: bool, when: DateTime<Utc>) -> Post {
    Post {
        id: id.to_string(),
        topic_external_id: topic_id(),
        author_username: author.to_string(),
        created_at: when,
        author_voting_power: power,
        deleted,
    }
}

fn topic_id() -> ExternalId {
    ExternalId::new("101").expect("topic id")
}

fn ended_id() -> ProposalId {
    ProposalId::new("prop-ended").expect("id")
}

fn ongoing_id() -> ProposalId {
    ProposalId::new("prop-ongoing").expect("id")
}

async fn seeded_source() -> Arc<FakeSource> {
    seed(FakeSource::default()).await
}

async fn seed(source: FakeSource) -> Arc<FakeSource> {
    let source = Arc::new(source);
    let ended = proposal(
        "prop-ended",
        ProposalSource::Onchain,
        VoteType::Basic,
        at(1, 0),
        at(8, 0),
    );
    let ongoing = proposal(
        "prop-ongoing",
        ProposalSource::Offchain,
        VoteType::Weighted,
        at(9, 0),
        at(20, 0),
    );
    source
        .insert_group(Group {
            id: GroupId::new(GROUP).expect("group"),
            name: "Treasury".to_string(),
            proposals: vec![ended, ongoing],
            topics: vec![Topic {
                external_id: topic_id(),
                title: "Treasury diversification".to_string(),
                created_at: at(5, 0),
                url: None,
                author_username: Some("alice".to_string()),
            }],
            author: GroupAuthor {
                voter_addresses: ["0xAAA".to_string()].into_iter().collect(),
                forum_usernames: ["alice".to_string()].into_iter().collect(),
            },
        })
        .await;
    source
        .insert_votes(
            ended_id(),
            vec![
                vote("0xaaa", 600.0, &[(0, 100.0)], at(2, 10)),
                vote("0xbbb", 50.0, &[(0, 100.0)], at(2, 11)),
                vote("0xaaa", 650.0, &[(1, 100.0)], at(3, 9)),
                vote("0xccc", 5.0, &[(2, 100.0)], at(4, 15)),
            ],
        )
        .await;
    source
        .insert_inputs(
            ended_id(),
            GovernanceInputs {
                quorum_choices: [0, 2].into_iter().collect(),
                total_delegated_vp: Some(5_000.0),
            },
        )
        .await;
    source
        .insert_votes(
            ongoing_id(),
            vec![vote("0xddd", 20.0, &[(0, 50.0), (1, 50.0)], at(9, 8))],
        )
        .await;
    source
        .insert_posts(
            topic_id(),
            vec![
                post("1", "alice", Some(2_000.0), false, at(6, 10)),
                post("2", "bob", None, false, at(6, 14)),
                post("3", "carol", Some(50.0), true, at(7, 9)),
                post("4", "dave", Some(20.0), false, at(9, 9)),
            ],
        )
        .await;
    source
}

fn service(source: Arc<FakeSource>) -> FeedService {
    FeedService::new(source, Arc::new(FixedClock(now())), &EngineConfig::default())
}

async fn timeline(service: &FeedService, request: TimelineRequest) -> Vec<FeedEvent> {
    service
        .assemble_group_timeline(GROUP, request)
        .await
        .expect("assemble")
        .expect("group exists")
}

fn kinds(events: &[FeedEvent]) -> Vec<&'static str> {
    events.iter().map(FeedEvent::kind).collect()
}

fn result_for<'a>(events: &'a [FeedEvent], id: &ProposalId) -> &'a bijux_agora_model::ResultEvent {
    events
        .iter()
        .find_map(|event| match event {
            FeedEvent::ResultOngoingBasic(e)
            | FeedEvent::ResultOngoingOther(e)
            | FeedEvent::ResultEndedBasic(e)
            | FeedEvent::ResultEndedOther(e)
                if &e.proposal_id == id =>
            {
                Some(e)
            }
            _ => None,
        })
        .expect("result event")
}

#[tokio::test]
async fn timeline_is_sorted_newest_first_with_one_result_per_started_proposal() {
    let events = timeline(&service(seeded_source().await), TimelineRequest::default()).await;

    assert!(events
        .windows(2)
        .all(|w| w[0].timestamp() >= w[1].timestamp()));
    assert_eq!(events[0].kind(), "result_ongoing_other");
    assert_eq!(events[0].timestamp(), now());
    assert_eq!(events.iter().filter(|e| e.is_result()).count(), 2);

    let ended = result_for(&events, &ended_id());
    assert_eq!(ended.timestamp, at(8, 0));
    assert_eq!(ended.content, "Onchain vote ended");
    assert_eq!(ended.result.total_voting_power, 705.0);
    assert_eq!(ended.result.final_results[&1], 650.0);
    assert_eq!(ended.result.quorum_voting_power, Some(55.0));
    assert_eq!(ended.result.quorum_reached, Some(false));
    assert_eq!(ended.result.total_delegated_vp, Some(5_000.0));
    assert_eq!(ended.vote_segments["1"], vec![VoteSegment::individual(650.0)]);
    assert_eq!(ended.vote_segments["0"], vec![VoteSegment::individual(50.0)]);
    assert_eq!(ended.vote_segments["2"], vec![VoteSegment::aggregated(5.0)]);

    let starts: Vec<&str> = events
        .iter()
        .filter(|e| matches!(e, FeedEvent::Onchain(_) | FeedEvent::Offchain(_)))
        .map(FeedEvent::content)
        .collect();
    assert_eq!(starts, vec!["Offchain vote started", "Onchain vote started"]);
}

#[tokio::test]
async fn daily_volume_events_follow_deduplicated_votes_and_live_posts() {
    let events = timeline(&service(seeded_source().await), TimelineRequest::default()).await;

    let votes_volume: Vec<(DateTime<Utc>, f64)> = events
        .iter()
        .filter_map(|e| match e {
            FeedEvent::VotesVolume(v) => Some((v.timestamp, v.metadata.voting_power)),
            _ => None,
        })
        .collect();
    assert_eq!(
        votes_volume,
        vec![
            (at(9, 8), 20.0),
            (at(4, 15), 5.0),
            (at(3, 9), 650.0),
            (at(2, 11), 50.0),
        ]
    );

    let comments: Vec<(DateTime<Utc>, u64, u64)> = events
        .iter()
        .filter_map(|e| match e {
            FeedEvent::CommentsVolume(c) => Some((c.timestamp, c.volume, c.max_volume)),
            _ => None,
        })
        .collect();
    assert_eq!(comments, vec![(at(9, 9), 1, 2), (at(6, 14), 2, 2)]);
}

#[tokio::test]
async fn slow_reads_for_linked_items_overlap() {
    let delay = Duration::from_millis(100);
    let source = seed(FakeSource::default().with_read_latency(delay)).await;
    let service = service(Arc::clone(&source));

    let started = Instant::now();
    let events = timeline(&service, TimelineRequest::default()).await;
    let elapsed = started.elapsed();

    // group, votes and inputs for two proposals, posts for one topic
    assert_eq!(source.fetch_calls(), 6);
    assert_eq!(events.iter().filter(|e| e.is_result()).count(), 2);
    assert!(elapsed >= delay * 2, "group read then item reads: {elapsed:?}");
    assert!(elapsed < delay * 5, "item reads ran one after another: {elapsed:?}");
}

#[tokio::test]
async fn summary_is_synthesized_when_newest_event_is_volume() {
    let source = seeded_source().await;
    source.fail_votes_for(ongoing_id()).await;
    let events = timeline(&service(source), TimelineRequest::default()).await;

    assert_eq!(events[0].kind(), "basic");
    assert_eq!(events[0].timestamp(), now());
    assert_eq!(events[0].content(), "3 comments and 3 votes");
    assert_eq!(events[1].kind(), "comments_volume");
}

#[tokio::test]
async fn failing_item_drops_only_its_own_contribution() {
    let source = seeded_source().await;
    source.fail_posts_for(topic_id()).await;
    let events = timeline(&service(source), TimelineRequest::default()).await;

    assert!(events
        .iter()
        .all(|e| !matches!(e, FeedEvent::Discussion(_) | FeedEvent::CommentsVolume(_))));
    assert_eq!(events.iter().filter(|e| e.is_result()).count(), 2);
}

#[tokio::test]
async fn results_only_keeps_result_snapshots() {
    let request = TimelineRequest {
        results_only: true,
        ..TimelineRequest::default()
    };
    let events = timeline(&service(seeded_source().await), request).await;
    assert_eq!(kinds(&events), vec!["result_ongoing_other", "result_ended_basic"]);
}

#[tokio::test]
async fn feed_filter_drops_the_other_volume_kind_only() {
    let service = service(seeded_source().await);
    let votes_only = timeline(
        &service,
        TimelineRequest {
            feed: FeedFilter::Votes,
            ..TimelineRequest::default()
        },
    )
    .await;
    assert!(!kinds(&votes_only).contains(&"comments_volume"));
    assert!(kinds(&votes_only).contains(&"discussion"));
    assert!(kinds(&votes_only).contains(&"votes_volume"));

    let comments_only = timeline(
        &service,
        TimelineRequest {
            feed: FeedFilter::Comments,
            ..TimelineRequest::default()
        },
    )
    .await;
    assert!(!kinds(&comments_only).contains(&"votes_volume"));
    assert!(kinds(&comments_only).contains(&"comments_volume"));
    assert_eq!(comments_only.iter().filter(|e| e.is_result()).count(), 2);
}

#[tokio::test]
async fn from_filter_reduces_volume_but_not_results() {
    let service = service(seeded_source().await);
    let events = timeline(
        &service,
        TimelineRequest {
            from: FromFilter::Hundred,
            ..TimelineRequest::default()
        },
    )
    .await;
    let volume_totals: Vec<f64> = events
        .iter()
        .filter(|e| e.is_volume())
        .map(FeedEvent::volume_total)
        .collect();
    assert_eq!(volume_totals, vec![1.0, 650.0]);
    assert_eq!(
        result_for(&events, &ended_id()).result.total_voting_power,
        705.0
    );

    let authored = timeline(
        &service,
        TimelineRequest {
            from: FromFilter::Author,
            ..TimelineRequest::default()
        },
    )
    .await;
    let authored_volume: Vec<&str> = authored
        .iter()
        .filter(|e| e.is_volume())
        .map(FeedEvent::kind)
        .collect();
    assert_eq!(authored_volume, vec!["comments_volume", "votes_volume"]);
}

#[tokio::test]
async fn hidden_votes_expose_only_totals_before_final() {
    let source = Arc::new(FakeSource::default());
    let mut shielded = proposal(
        "prop-shielded",
        ProposalSource::Offchain,
        VoteType::SingleChoice,
        at(9, 0),
        at(20, 0),
    );
    shielded.metadata.hidden_vote = true;
    shielded.metadata.scores_state = ScoresState::Pending;
    let shielded_id = shielded.id.clone();
    source
        .insert_group(Group {
            id: GroupId::new(HIDDEN_GROUP).expect("group"),
            name: "Shielded".to_string(),
            proposals: vec![shielded],
            topics: Vec::new(),
            author: GroupAuthor::default(),
        })
        .await;
    source
        .insert_votes(
            shielded_id.clone(),
            vec![
                vote("0x1", 70.0, &[(0, 100.0)], at(9, 2)),
                vote("0x2", 30.0, &[(1, 100.0)], at(9, 3)),
            ],
        )
        .await;

    let events = service(source)
        .assemble_group_timeline(HIDDEN_GROUP, TimelineRequest::default())
        .await
        .expect("assemble")
        .expect("group exists");

    let result = result_for(&events, &shielded_id);
    assert_eq!(result.result.total_voting_power, 100.0);
    assert!(result.result.final_results.is_empty());
    assert_eq!(result.result.choice_colors, vec!["#737373".to_string()]);
    assert!(result.vote_segments.values().all(Vec::is_empty));
    for event in &events {
        if let FeedEvent::VotesVolume(v) = event {
            assert_eq!(v.volumes, vec![100.0]);
            assert_eq!(v.colors, vec!["#737373".to_string()]);
        }
    }
}

#[tokio::test]
async fn identifiers_are_validated_before_any_fetch() {
    let source = seeded_source().await;
    let service = service(Arc::clone(&source));

    let err = service
        .assemble_group_timeline("not-a-uuid", TimelineRequest::default())
        .await
        .expect_err("invalid id");
    assert_eq!(err.code(), ErrorCode::InvalidIdentifier);
    assert_eq!(source.fetch_calls(), 0);

    let missing = service
        .assemble_group_timeline(
            "00000000-0000-4000-8000-000000000000",
            TimelineRequest::default(),
        )
        .await
        .expect("lookup");
    assert!(missing.is_none());
}

#[tokio::test]
async fn cached_timelines_skip_the_source() {
    let source = seeded_source().await;
    let cache: Arc<HotFeedCache<Vec<FeedEvent>>> =
        Arc::new(HotFeedCache::from_config(&EngineConfig::default()));
    let service = service(Arc::clone(&source)).with_cache(cache.clone());

    let first = timeline(&service, TimelineRequest::default()).await;
    let calls = source.fetch_calls();
    assert!(calls > 0);
    let second = timeline(&service, TimelineRequest::default()).await;
    assert_eq!(first, second);
    assert_eq!(source.fetch_calls(), calls);
    assert_eq!(cache.len(), 1);

    let _ = timeline(
        &service,
        TimelineRequest {
            results_only: true,
            ..TimelineRequest::default()
        },
    )
    .await;
    assert!(source.fetch_calls() > calls);
    assert!(CachePort::get(cache.as_ref(), "unrelated").is_none());
}

#[tokio::test]
async fn aggregated_timeline_coarsens_volume_without_losing_it() {
    let service = service(seeded_source().await);
    let plain = timeline(&service, TimelineRequest::default()).await;
    let level_zero = service
        .aggregated_group_timeline(GROUP, TimelineRequest::default(), 0)
        .await
        .expect("assemble")
        .expect("group");
    assert_eq!(level_zero, plain);

    let coarse = service
        .aggregated_group_timeline(GROUP, TimelineRequest::default(), 3)
        .await
        .expect("assemble")
        .expect("group");
    let volume = |events: &[FeedEvent]| -> f64 { events.iter().map(FeedEvent::volume_total).sum() };
    let volume_events = |events: &[FeedEvent]| events.iter().filter(|e| e.is_volume()).count();
    assert!(volume_events(coarse.as_slice()) < volume_events(plain.as_slice()));
    assert_eq!(volume(coarse.as_slice()), volume(plain.as_slice()));
    assert!(coarse
        .windows(2)
        .all(|w| w[0].timestamp() >= w[1].timestamp()));
}

#[tokio::test]
async fn proposal_results_decorate_votes_heaviest_first() {
    let service = service(seeded_source().await);
    let results = service
        .proposal_results(
            GROUP,
            "prop-ended",
            ResultsOptions {
                with_votes: true,
                with_timeseries: true,
                aggregated_votes: false,
            },
        )
        .await
        .expect("results")
        .expect("proposal exists");
    let votes = results.votes.expect("votes");
    let voters: Vec<&str> = votes.iter().map(|v| v.voter_address.as_str()).collect();
    assert_eq!(voters, vec!["0xaaa", "0xbbb", "0xccc"]);
    assert_eq!(votes[0].choice[0].text, "Against");
    let series = results.time_series_data.expect("series");
    assert_eq!(series.first().map(|p| p.timestamp), Some(at(1, 0)));
    assert_eq!(series.last().map(|p| p.timestamp), Some(at(8, 0)));

    let unknown = service
        .proposal_results(GROUP, "prop-missing", ResultsOptions::default())
        .await
        .expect("lookup");
    assert!(unknown.is_none());
    assert_eq!(results.quorum_choices, BTreeSet::from([0, 2]));
}

#[tokio::test]
async fn proposal_results_surface_fetch_failures_as_source_errors() {
    let source = seeded_source().await;
    source.fail_votes_for(ended_id()).await;
    let err = service(source)
        .proposal_results(GROUP, "prop-ended", ResultsOptions::default())
        .await
        .expect_err("vote fetch fails");
    assert_eq!(err.code(), ErrorCode::Source);
    assert!(err.to_string().contains("proposal prop-ended"));
}
