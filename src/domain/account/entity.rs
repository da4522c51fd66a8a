//! Account entity and related types
//!
//! Accounts are owned by the upstream authentication collaborator; this core
//! only reads their public attributes and subscription plan.

use serde::{Deserialize, Serialize};

/// Account (owner) identifier - opaque, supplied by the session layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OwnerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subscription plan, parameterizes quotas and key-count limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Business,
}

impl Plan {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Business => "business",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            "business" => Some(Self::Business),
            _ => None,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-plan limits on concurrently active API keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanQuotas {
    pub free: u32,
    pub pro: u32,
    pub business: u32,
}

impl Default for PlanQuotas {
    fn default() -> Self {
        Self {
            free: 1,
            pro: 1,
            business: 3,
        }
    }
}

impl PlanQuotas {
    /// Maximum number of active API keys allowed for the given plan
    pub fn max_active_keys(&self, plan: Plan) -> u32 {
        match plan {
            Plan::Free => self.free,
            Plan::Pro => self.pro,
            Plan::Business => self.business,
        }
    }
}

/// Public attributes of an account, as surfaced on credential validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: OwnerId,
    email: String,
    username: String,
    plan: Plan,
}

impl Account {
    pub fn new(
        id: OwnerId,
        email: impl Into<String>,
        username: impl Into<String>,
        plan: Plan,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            username: username.into(),
            plan,
        }
    }

    pub fn id(&self) -> &OwnerId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_parse_roundtrip() {
        for plan in [Plan::Free, Plan::Pro, Plan::Business] {
            assert_eq!(Plan::parse(plan.as_str()), Some(plan));
        }
        assert_eq!(Plan::parse("enterprise"), None);
    }

    #[test]
    fn test_default_plan_quotas() {
        let quotas = PlanQuotas::default();

        assert_eq!(quotas.max_active_keys(Plan::Free), 1);
        assert_eq!(quotas.max_active_keys(Plan::Pro), 1);
        assert_eq!(quotas.max_active_keys(Plan::Business), 3);
    }

    #[test]
    fn test_account_accessors() {
        let account = Account::new(
            OwnerId::new("owner-1"),
            "a@example.com",
            "alice",
            Plan::Pro,
        );

        assert_eq!(account.id().as_str(), "owner-1");
        assert_eq!(account.email(), "a@example.com");
        assert_eq!(account.username(), "alice");
        assert_eq!(account.plan(), Plan::Pro);
    }
}
