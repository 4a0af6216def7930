// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

pub const ENV_MIN_VISIBLE_WIDTH_PERCENT: &str = "BIJUX_AGORA_MIN_VISIBLE_WIDTH_PERCENT";
pub const ENV_TIMEZONE_OFFSET_MINUTES: &str = "BIJUX_AGORA_TIMEZONE_OFFSET_MINUTES";
pub const ENV_NEUTRAL_COLOR: &str = "BIJUX_AGORA_NEUTRAL_COLOR";
pub const ENV_FEED_CACHE_TTL_MS: &str = "BIJUX_AGORA_FEED_CACHE_TTL_MS";
pub const ENV_FEED_CACHE_MAX_ENTRIES: &str = "BIJUX_AGORA_FEED_CACHE_MAX_ENTRIES";
pub const ENV_SUMMARY_ENABLED: &str = "BIJUX_AGORA_SUMMARY_ENABLED";

const MAX_TIMEZONE_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Share of total voting power (in percent) a single vote needs to get
    /// its own segment instead of landing in the aggregated tail.
    pub min_visible_width_percent: f64,
    /// Offset from UTC used to decide which calendar day an event falls on.
    pub timezone_offset_minutes: i32,
    /// Color surfaced for hidden votes.
    pub neutral_color: String,
    pub feed_cache_ttl: Duration,
    pub feed_cache_max_entries: usize,
    pub summary_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_visible_width_percent: 1.0,
            timezone_offset_minutes: 0,
            neutral_color: "#737373".to_string(),
            feed_cache_ttl: Duration::from_secs(30),
            feed_cache_max_entries: 256,
            summary_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `BIJUX_AGORA_*` variable that parses.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            min_visible_width_percent: env_f64(
                ENV_MIN_VISIBLE_WIDTH_PERCENT,
                defaults.min_visible_width_percent,
            ),
            timezone_offset_minutes: env_i32(
                ENV_TIMEZONE_OFFSET_MINUTES,
                defaults.timezone_offset_minutes,
            ),
            neutral_color: env::var(ENV_NEUTRAL_COLOR)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.neutral_color),
            feed_cache_ttl: Duration::from_millis(env_u64(
                ENV_FEED_CACHE_TTL_MS,
                defaults.feed_cache_ttl.as_millis() as u64,
            )),
            feed_cache_max_entries: env_u64(
                ENV_FEED_CACHE_MAX_ENTRIES,
                defaults.feed_cache_max_entries as u64,
            ) as usize,
            summary_enabled: env_bool(ENV_SUMMARY_ENABLED, defaults.summary_enabled),
        };
        validate_engine_config(&config)?;
        Ok(config)
    }
}

pub fn validate_engine_config(config: &EngineConfig) -> Result<()> {
    let pct = config.min_visible_width_percent;
    if !pct.is_finite() || pct <= 0.0 || pct > 100.0 {
        return Err(Error::InvalidConfig {
            field: "min_visible_width_percent",
            reason: format!("must be within (0, 100], got {pct}"),
        });
    }
    if config.timezone_offset_minutes.abs() > MAX_TIMEZONE_OFFSET_MINUTES {
        return Err(Error::InvalidConfig {
            field: "timezone_offset_minutes",
            reason: format!(
                "must be within +/-{MAX_TIMEZONE_OFFSET_MINUTES}, got {}",
                config.timezone_offset_minutes
            ),
        });
    }
    if config.neutral_color.trim().is_empty() {
        return Err(Error::InvalidConfig {
            field: "neutral_color",
            reason: "must not be empty".to_string(),
        });
    }
    if config.feed_cache_max_entries == 0 {
        return Err(Error::InvalidConfig {
            field: "feed_cache_max_entries",
            reason: "must be > 0".to_string(),
        });
    }
    Ok(())
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_i32(name: &str, default: i32) -> i32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<i32>().ok())
        .unwrap_or(default)
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}
