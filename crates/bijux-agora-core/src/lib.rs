#![forbid(unsafe_code)]
//! Shared foundation for the agora governance feed engine.
//!
//! Nothing in this crate performs I/O. Wall-clock access and caching are
//! expressed as ports so the tally and feed crates stay deterministic under
//! test.

pub mod canonical;
pub mod config;
mod errors;
pub mod ports;
pub mod types;

pub use config::{validate_engine_config, EngineConfig};
pub use errors::{Error, ErrorCode, Result, ResultExt};
pub use ports::{CachePort, ClockPort, FixedClock, SystemClock};
pub use types::ids::{ExternalId, GroupId, ProposalId};

pub const CRATE_NAME: &str = "bijux-agora-core";

pub const ENV_AGORA_LOG_LEVEL: &str = "BIJUX_AGORA_LOG_LEVEL";
pub const ENV_AGORA_LOG_FORMAT: &str = "BIJUX_AGORA_LOG_FORMAT";
