// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use chrono::{DateTime, Utc};

pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant; used wherever "now" must be reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Key/value memoization collaborator. Expiry policy belongs to the
/// implementation; callers only supply the ttl they want honored.
pub trait CachePort<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;
    fn put(&self, key: String, value: V, ttl: Duration);
}
