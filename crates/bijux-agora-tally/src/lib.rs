#![forbid(unsafe_code)]
//! Synchronous tally stages of the agora engine.
//!
//! Data flows `normalize` -> `results` -> `segments`, with `daily` feeding
//! volume events and `volume` coarsening a finished timeline. Every stage is
//! a pure function of its inputs; data-quality problems are logged and
//! skipped, never returned as errors.

pub mod colors;
pub mod daily;
pub mod normalize;
pub mod ranked;
pub mod results;
pub mod segments;
pub mod timeseries;
pub mod volume;

pub use colors::{choice_color, choice_colors};
pub use daily::DailyVolumeBucketer;
pub use normalize::dedupe_latest_votes;
pub use ranked::{instant_runoff, runoff_rounds, Ballot};
pub use results::ResultsAggregator;
pub use segments::SegmentBucketer;
pub use volume::{aggregate_volume_events, merge_count};

pub const CRATE_NAME: &str = "bijux-agora-tally";
