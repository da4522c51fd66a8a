//! Fixed-window rate limiter

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::account::OwnerId;
use crate::domain::counter::CounterStore;
use crate::domain::rate_limit::{Identity, KeyingStrategy, PolicyTable, RouteClass};
use crate::domain::DomainError;

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Whether the request may proceed
    pub admitted: bool,
    /// The policy's per-window ceiling
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// Seconds until the window resets; doubles as Retry-After on rejection
    pub reset_secs: u64,
}

/// Rate limiter evaluating requests against the per-class policy table
///
/// Counting is increment-then-check over the shared counter store: every
/// arrival bumps the counter, and the request is admitted iff the resulting
/// count is within the policy ceiling. Rejected requests still consume a
/// counter slot.
#[derive(Debug)]
pub struct RateLimiter {
    counters: Arc<dyn CounterStore>,
    policies: PolicyTable,
}

impl RateLimiter {
    pub fn new(counters: Arc<dyn CounterStore>, policies: PolicyTable) -> Self {
        Self { counters, policies }
    }

    /// Resolve the counting identity for a route class
    pub fn resolve_identity(
        &self,
        class: RouteClass,
        owner: Option<&OwnerId>,
        address: &str,
    ) -> Identity {
        match self.policies.policy(class).key_by {
            KeyingStrategy::Address => Identity::address(address),
            KeyingStrategy::OwnerOrAddress => match owner {
                Some(id) => Identity::Owner(id.clone()),
                None => Identity::address(address),
            },
        }
    }

    /// Evaluate one request against the class policy
    ///
    /// Counter-store failures propagate; the caller denies on error rather
    /// than waving traffic through an unobservable window.
    pub async fn check(
        &self,
        class: RouteClass,
        path: &str,
        identity: &Identity,
    ) -> Result<Admission, DomainError> {
        let policy = self.policies.policy(class);

        if policy.bypasses(path) {
            return Ok(Admission {
                admitted: true,
                limit: policy.max_requests,
                remaining: policy.max_requests,
                reset_secs: 0,
            });
        }

        let counter_key = format!("ratelimit:{}:{}", class, identity.counter_key());
        let sample = self.counters.increment(&counter_key, policy.window).await?;

        let admitted = sample.count <= policy.max_requests as u64;
        let remaining = (policy.max_requests as u64).saturating_sub(sample.count) as u32;

        if !admitted {
            debug!(
                class = %class,
                identity = %identity,
                count = sample.count,
                limit = policy.max_requests,
                "Rate limit exceeded"
            );
        }

        Ok(Admission {
            admitted,
            limit: policy.max_requests,
            remaining,
            reset_secs: sample.reset_secs,
        })
    }

    /// Touch the counter store to verify it is reachable
    ///
    /// Used by the readiness probe. The probe counter expires after a second
    /// and never collides with a tenant's window.
    pub async fn probe(&self) -> Result<(), DomainError> {
        self.counters
            .increment("ratelimit:probe", Duration::from_secs(1))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::counter::InMemoryCounterStore;

    fn create_limiter() -> RateLimiter {
        RateLimiter::new(
            Arc::new(InMemoryCounterStore::new()),
            PolicyTable::default(),
        )
    }

    #[tokio::test]
    async fn test_admits_up_to_limit_then_rejects() {
        let limiter = create_limiter();
        let identity = Identity::owner("owner-1");

        for i in 0..3 {
            let admission = limiter
                .check(RouteClass::Payment, "/api/checkout", &identity)
                .await
                .unwrap();
            assert!(admission.admitted, "request {} should be admitted", i);
            assert_eq!(admission.limit, 3);
            assert_eq!(admission.remaining, 2 - i);
        }

        let rejected = limiter
            .check(RouteClass::Payment, "/api/checkout", &identity)
            .await
            .unwrap();
        assert!(!rejected.admitted);
        assert_eq!(rejected.remaining, 0);
        assert!(rejected.reset_secs > 0 && rejected.reset_secs <= 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_lapse_restores_full_allowance() {
        let limiter = create_limiter();
        let identity = Identity::owner("owner-1");

        for _ in 0..4 {
            limiter
                .check(RouteClass::Payment, "/api/checkout", &identity)
                .await
                .unwrap();
        }

        tokio::time::advance(Duration::from_secs(61)).await;

        let admission = limiter
            .check(RouteClass::Payment, "/api/checkout", &identity)
            .await
            .unwrap();
        assert!(admission.admitted);
        assert_eq!(admission.remaining, 2);
    }

    #[tokio::test]
    async fn test_identities_do_not_share_allowance() {
        let limiter = create_limiter();

        for _ in 0..4 {
            limiter
                .check(
                    RouteClass::Payment,
                    "/api/checkout",
                    &Identity::owner("owner-1"),
                )
                .await
                .unwrap();
        }

        let other = limiter
            .check(
                RouteClass::Payment,
                "/api/checkout",
                &Identity::owner("owner-2"),
            )
            .await
            .unwrap();
        assert!(other.admitted);

        // Same string as an address is a different identity entirely
        let addr = limiter
            .check(
                RouteClass::Payment,
                "/api/checkout",
                &Identity::address("owner-1"),
            )
            .await
            .unwrap();
        assert!(addr.admitted);
    }

    #[tokio::test]
    async fn test_classes_count_separately() {
        let limiter = create_limiter();
        let identity = Identity::owner("owner-1");

        for _ in 0..3 {
            limiter
                .check(RouteClass::Payment, "/api/checkout", &identity)
                .await
                .unwrap();
        }

        let ai = limiter
            .check(RouteClass::Ai, "/api/generate", &identity)
            .await
            .unwrap();
        assert!(ai.admitted);
        assert_eq!(ai.remaining, 9);
    }

    #[tokio::test]
    async fn test_health_bypass_never_counts() {
        let limiter = create_limiter();
        let identity = Identity::address("10.0.0.1");

        for _ in 0..200 {
            let admission = limiter
                .check(RouteClass::General, "/health", &identity)
                .await
                .unwrap();
            assert!(admission.admitted);
        }

        // The counter was never touched by the bypassed requests
        let first_real = limiter
            .check(RouteClass::General, "/api/keys", &identity)
            .await
            .unwrap();
        assert_eq!(first_real.remaining, 99);
    }

    #[tokio::test]
    async fn test_auth_class_keys_by_address() {
        let limiter = create_limiter();
        let owner = OwnerId::new("owner-1");

        let identity = limiter.resolve_identity(RouteClass::Auth, Some(&owner), "10.0.0.1");
        assert_eq!(identity, Identity::address("10.0.0.1"));

        let identity = limiter.resolve_identity(RouteClass::General, Some(&owner), "10.0.0.1");
        assert_eq!(identity, Identity::Owner(owner.clone()));

        let identity = limiter.resolve_identity(RouteClass::General, None, "10.0.0.1");
        assert_eq!(identity, Identity::address("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_rejection_consumes_a_slot() {
        let limiter = create_limiter();
        let identity = Identity::address("10.0.0.1");

        for _ in 0..10 {
            limiter
                .check(RouteClass::Auth, "/auth/login", &identity)
                .await
                .unwrap();
        }

        // Still rejected; over-limit attempts did not reset anything
        let admission = limiter
            .check(RouteClass::Auth, "/auth/login", &identity)
            .await
            .unwrap();
        assert!(!admission.admitted);
    }
}
