#![forbid(unsafe_code)]
//! Agora model SSOT.
//!
//! Every type here is request-scoped and immutable once built; the engine
//! reads upstream records and derives results, it never persists them.
//!
//! ```compile_fail
//! use bijux_agora_model::FeedFilter;
//!
//! fn exhaustive_match(f: FeedFilter) -> &'static str {
//!     match f {
//!         FeedFilter::All => "all",
//!         FeedFilter::Votes => "votes",
//!     }
//! }
//! ```

mod bucket;
mod discussion;
mod event;
mod filters;
mod proposal;
mod results;
mod segment;
mod vote;

pub use bucket::{max_volume, DailyBuckets, DailyPostBucket, DailyVoteBucket};
pub use discussion::{Group, GroupAuthor, Post, Topic};
pub use event::{
    CommentsVolumeEvent, FeedEvent, MilestoneEvent, ResultEvent, VotesVolumeEvent,
    VotesVolumeMetadata,
};
pub use filters::{FeedFilter, FromFilter};
pub use proposal::{Proposal, ProposalMetadata, ProposalSource, ScoresState, VoteType};
pub use results::{
    GovernanceInputs, ProcessedResults, RankedRound, ResultsOptions, TimeSeriesPoint,
    TOTAL_SERIES_KEY,
};
pub use segment::{VoteSegment, VoteSegments};
pub use vote::{voter_key, Vote, VoteChoice};

pub const CRATE_NAME: &str = "bijux-agora-model";
