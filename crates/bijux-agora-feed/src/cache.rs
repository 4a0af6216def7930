// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use bijux_agora_core::canonical::stable_json_hash_hex;
use bijux_agora_core::{CachePort, EngineConfig, GroupId, Result};
use bijux_agora_model::{FeedFilter, FromFilter};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::Serialize;

use crate::timeline::TimelineRequest;

struct HotEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> HotEntry<V> {
    fn is_fresh(&self) -> bool {
        self.created_at.elapsed() <= self.ttl
    }
}

/// Bounded in-memory TTL cache. When full, the oldest entry is evicted.
pub struct HotFeedCache<V> {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<String, HotEntry<V>>>,
}

impl<V: Clone> HotFeedCache<V> {
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.feed_cache_ttl, config.feed_cache_max_entries)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| e.is_fresh()).count())
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send> CachePort<V> for HotFeedCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        entries.retain(|_, e| e.is_fresh());
        entries.get(key).map(|e| e.value.clone())
    }

    fn put(&self, key: String, value: V, ttl: Duration) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        entries.retain(|_, e| e.is_fresh());
        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            if let Some(victim) = entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&victim);
            }
        }
        entries.insert(
            key,
            HotEntry {
                value,
                created_at: Instant::now(),
                ttl: ttl.min(self.ttl),
            },
        );
    }
}

#[derive(Serialize)]
struct FeedCacheKey<'a> {
    group: &'a str,
    feed: FeedFilter,
    from: FromFilter,
    results_only: bool,
    minute: DateTime<Utc>,
}

/// Canonical hash of a timeline request. Requests within the same wall-clock
/// minute share a key.
pub fn feed_cache_key(
    group: &GroupId,
    request: TimelineRequest,
    now: DateTime<Utc>,
) -> Result<String> {
    let key = FeedCacheKey {
        group: group.as_str(),
        feed: request.feed,
        from: request.from,
        results_only: request.results_only,
        minute: now.duration_trunc(TimeDelta::minutes(1)).unwrap_or(now),
    };
    Ok(stable_json_hash_hex(&key)?)
}
