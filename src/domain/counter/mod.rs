//! Counter store trait definition
//!
//! The substrate rate limiting is built on: shared counters with atomic
//! increment-with-expiry semantics. Production deployments use a single
//! shared backend so that every server instance observes the same counts;
//! per-process memory would multiply the effective quota by the instance
//! count.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Observation returned by a counter increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    /// Counter value after this increment
    pub count: u64,
    /// Seconds until the window lapses and the counter resets
    pub reset_secs: u64,
}

/// Atomic increment-with-expiry over a shared counting substrate
///
/// The time-to-live is fixed when the counter is first created and equals the
/// window duration; subsequent increments within the window do not extend it
/// (fixed-window reset, not sliding).
#[async_trait]
pub trait CounterStore: Send + Sync + Debug {
    /// Atomically increment the counter for `key`, creating it with a TTL of
    /// `window` if absent, and return the new count plus seconds until reset
    async fn increment(&self, key: &str, window: Duration) -> Result<CounterSample, DomainError>;
}
