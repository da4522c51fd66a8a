//! Declarative per-route-class rate-limit policies

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A named category of endpoints sharing one rate-limit policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteClass {
    /// Login/signup-adjacent endpoints, keyed strictly by client address
    Auth,
    /// Checkout and payment operations
    Payment,
    /// Expensive AI calls
    Ai,
    /// File uploads
    Upload,
    /// Everything else
    General,
}

impl RouteClass {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Auth => "auth",
            Self::Payment => "payment",
            Self::Ai => "ai",
            Self::Upload => "upload",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for RouteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the counting identity is chosen for a route class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyingStrategy {
    /// Always the resolved client address
    Address,
    /// The authenticated owner when present, falling back to the address
    #[default]
    OwnerOrAddress,
}

/// Policy for one route class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Fixed observation window
    pub window: Duration,
    /// Maximum admitted requests per window
    pub max_requests: u32,
    /// Identity-resolution strategy
    pub key_by: KeyingStrategy,
    /// Paths admitted unconditionally, bypassing the counter
    pub bypass_paths: Vec<String>,
}

impl RateLimitPolicy {
    pub fn new(window: Duration, max_requests: u32, key_by: KeyingStrategy) -> Self {
        Self {
            window,
            max_requests,
            key_by,
            bypass_paths: Vec::new(),
        }
    }

    pub fn with_bypass_paths(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.bypass_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn bypasses(&self, path: &str) -> bool {
        self.bypass_paths.iter().any(|p| p == path)
    }
}

/// The full route-class -> policy table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    pub auth: RateLimitPolicy,
    pub payment: RateLimitPolicy,
    pub ai: RateLimitPolicy,
    pub upload: RateLimitPolicy,
    pub general: RateLimitPolicy,
}

impl PolicyTable {
    pub fn policy(&self, class: RouteClass) -> &RateLimitPolicy {
        match class {
            RouteClass::Auth => &self.auth,
            RouteClass::Payment => &self.payment,
            RouteClass::Ai => &self.ai,
            RouteClass::Upload => &self.upload,
            RouteClass::General => &self.general,
        }
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            auth: RateLimitPolicy::new(
                Duration::from_secs(15 * 60),
                5,
                KeyingStrategy::Address,
            ),
            payment: RateLimitPolicy::new(
                Duration::from_secs(60),
                3,
                KeyingStrategy::OwnerOrAddress,
            ),
            ai: RateLimitPolicy::new(
                Duration::from_secs(60),
                10,
                KeyingStrategy::OwnerOrAddress,
            ),
            upload: RateLimitPolicy::new(
                Duration::from_secs(60 * 60),
                20,
                KeyingStrategy::OwnerOrAddress,
            ),
            general: RateLimitPolicy::new(
                Duration::from_secs(60),
                100,
                KeyingStrategy::OwnerOrAddress,
            )
            .with_bypass_paths(["/health", "/live", "/ready"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers_match_policy() {
        let table = PolicyTable::default();

        let auth = table.policy(RouteClass::Auth);
        assert_eq!(auth.window, Duration::from_secs(900));
        assert_eq!(auth.max_requests, 5);
        assert_eq!(auth.key_by, KeyingStrategy::Address);

        let payment = table.policy(RouteClass::Payment);
        assert_eq!(payment.window, Duration::from_secs(60));
        assert_eq!(payment.max_requests, 3);
        assert_eq!(payment.key_by, KeyingStrategy::OwnerOrAddress);

        let general = table.policy(RouteClass::General);
        assert_eq!(general.max_requests, 100);
        assert!(general.bypasses("/health"));
        assert!(!general.bypasses("/api/keys"));
    }

    #[test]
    fn test_route_class_names() {
        assert_eq!(RouteClass::Auth.as_str(), "auth");
        assert_eq!(RouteClass::General.to_string(), "general");
    }
}
