//! In-memory counter store implementation

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::counter::{CounterSample, CounterStore};
use crate::domain::DomainError;

/// In-memory implementation of CounterStore
///
/// Counters are per-process, so with multiple server instances the effective
/// limit multiplies by the instance count. Suitable for single-instance
/// deployments and tests; shared deployments use the Redis store.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: RwLock<HashMap<String, Counter>>,
}

#[derive(Debug)]
struct Counter {
    count: u64,
    expires_at: Instant,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str, window: Duration) -> Result<CounterSample, DomainError> {
        let now = Instant::now();
        let mut counters = self.counters.write().await;

        let counter = counters
            .entry(key.to_string())
            .and_modify(|c| {
                // Lapsed window starts a fresh one; TTL is otherwise untouched
                if c.expires_at <= now {
                    c.count = 0;
                    c.expires_at = now + window;
                }
            })
            .or_insert_with(|| Counter {
                count: 0,
                expires_at: now + window,
            });

        counter.count += 1;

        let reset_secs = counter
            .expires_at
            .saturating_duration_since(now)
            .as_secs()
            .max(1);

        Ok(CounterSample {
            count: counter.count,
            reset_secs,
        })
    }
}
