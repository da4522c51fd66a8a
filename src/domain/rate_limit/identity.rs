//! Identity resolution types for rate limiting

use serde::{Deserialize, Serialize};

use crate::domain::account::OwnerId;

/// The principal an admission check is evaluated against
///
/// Derived per request, never persisted: the authenticated owner when one is
/// known, otherwise the resolved client address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    /// An authenticated account
    Owner(OwnerId),
    /// A client network address (proxy-resolved or raw socket)
    Address(String),
}

impl Identity {
    pub fn owner(id: impl Into<String>) -> Self {
        Self::Owner(OwnerId::new(id))
    }

    pub fn address(addr: impl Into<String>) -> Self {
        Self::Address(addr.into())
    }

    /// Stable counting-key fragment for this identity
    pub fn counter_key(&self) -> String {
        match self {
            Self::Owner(id) => format!("owner:{}", id),
            Self::Address(addr) => format!("addr:{}", addr),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Owner(_))
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.counter_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_key_distinguishes_kind() {
        let owner = Identity::owner("abc");
        let addr = Identity::address("abc");

        assert_ne!(owner.counter_key(), addr.counter_key());
        assert_eq!(owner.counter_key(), "owner:abc");
        assert_eq!(addr.counter_key(), "addr:abc");
    }

    #[test]
    fn test_is_authenticated() {
        assert!(Identity::owner("abc").is_authenticated());
        assert!(!Identity::address("10.0.0.1").is_authenticated());
    }
}
