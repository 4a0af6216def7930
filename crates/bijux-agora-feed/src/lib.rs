#![forbid(unsafe_code)]
//! Group timeline assembly for the agora engine.
//!
//! [`FeedService`] fetches a group's proposals and forum topics through a
//! [`GovernanceSource`], fans the per-item loads out concurrently and feeds
//! the results to the synchronous [`TimelineAssembler`]. A failing item is
//! logged and dropped; the rest of the timeline is still produced.

mod cache;
mod filtering;
mod fragments;
pub mod logging;
mod service;
pub mod source;
mod summary;
mod timeline;

pub use cache::{feed_cache_key, HotFeedCache};
pub use filtering::{filter_posts, filter_votes, live_post_count};
pub use fragments::DISCUSSION_STARTED;
pub use service::{FeedCache, FeedService};
pub use source::fake::FakeSource;
pub use source::{GovernanceSource, SourceError, SourceErrorCode};
pub use summary::{summary_content, NO_ACTIVITY};
pub use timeline::{ProposalActivity, TimelineAssembler, TimelineRequest, TopicActivity};

pub const CRATE_NAME: &str = "bijux-agora-feed";
