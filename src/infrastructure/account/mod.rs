//! Account infrastructure
//!
//! Accounts live in the upstream auth/billing system; this in-memory
//! repository mirrors the subset the gateway needs and is populated at
//! startup (and by tests).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::account::{Account, AccountRepository, OwnerId};
use crate::domain::DomainError;

/// In-memory implementation of AccountRepository
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<OwnerId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an account
    pub fn insert(&self, account: Account) {
        let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
        accounts.insert(account.id().clone(), account);
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, id: &OwnerId) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
        Ok(accounts.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Plan;

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryAccountRepository::new();
        repo.insert(Account::new(
            OwnerId::new("owner-1"),
            "a@example.com",
            "alice",
            Plan::Pro,
        ));

        let found = repo.get(&OwnerId::new("owner-1")).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().plan(), Plan::Pro);

        let missing = repo.get(&OwnerId::new("owner-2")).await.unwrap();
        assert!(missing.is_none());
    }
}
