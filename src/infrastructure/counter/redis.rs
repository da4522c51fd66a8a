//! Redis counter store implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Client;

use crate::domain::counter::{CounterSample, CounterStore};
use crate::domain::DomainError;

/// Redis-backed implementation of CounterStore
///
/// INCR plus EXPIRE NX keeps the count and TTL correct across any number of
/// server instances; the TTL is set only when the key is created, so the
/// window never slides.
#[derive(Clone)]
pub struct RedisCounterStore {
    connection: ConnectionManager,
}

impl fmt::Debug for RedisCounterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCounterStore")
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCounterStore {
    /// Connect to Redis at the given URL
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let client = Client::open(url).map_err(|e| {
            DomainError::infrastructure(format!("Failed to create Redis client: {}", e))
        })?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::infrastructure(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str, window: Duration) -> Result<CounterSample, DomainError> {
        let mut conn = self.connection.clone();
        let window_secs = window.as_secs().max(1);

        // One round trip: INCR, set TTL only on creation, read remaining TTL
        let (count, _, ttl_secs): (u64, i64, i64) = redis::pipe()
            .cmd("INCR")
            .arg(key)
            .cmd("EXPIRE")
            .arg(key)
            .arg(window_secs as i64)
            .arg("NX")
            .cmd("TTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::infrastructure(format!(
                    "Failed to increment counter '{}': {}",
                    key, e
                ))
            })?;

        // TTL returns -1 for keys without expiry; treat as a full window
        let reset_secs = if ttl_secs > 0 {
            ttl_secs as u64
        } else {
            window_secs
        };

        Ok(CounterSample { count, reset_secs })
    }
}

// These tests require a running Redis instance.
// Run with: cargo test -- --ignored
#[cfg(test)]
mod tests {
    use super::*;

    async fn connect() -> RedisCounterStore {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        RedisCounterStore::connect(&url).await.unwrap()
    }

    fn unique_key() -> String {
        format!("test:counter:{}", uuid::Uuid::new_v4())
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_increment_and_ttl() {
        let store = connect().await;
        let key = unique_key();
        let window = Duration::from_secs(60);

        let first = store.increment(&key, window).await.unwrap();
        assert_eq!(first.count, 1);
        assert!(first.reset_secs > 50 && first.reset_secs <= 60);

        let second = store.increment(&key, window).await.unwrap();
        assert_eq!(second.count, 2);
        // TTL did not restart on the second increment
        assert!(second.reset_secs <= first.reset_secs);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_keys_are_independent() {
        let store = connect().await;
        let window = Duration::from_secs(60);

        let a = unique_key();
        let b = unique_key();

        store.increment(&a, window).await.unwrap();
        store.increment(&a, window).await.unwrap();

        let sample = store.increment(&b, window).await.unwrap();
        assert_eq!(sample.count, 1);
    }
}
