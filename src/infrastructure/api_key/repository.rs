//! In-memory API key repository implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::OwnerId;
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::DomainError;

/// In-memory implementation of ApiKeyRepository
///
/// Keys are held in a map by id with a digest index for the validation hot
/// path. The quota check in `create` runs under the same write lock as the
/// insert, which is what makes it atomic here.
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    keys: HashMap<ApiKeyId, ApiKey>,
    digest_index: HashMap<String, ApiKeyId>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn create(&self, api_key: ApiKey, max_active: u32) -> Result<ApiKey, DomainError> {
        let mut inner = self.inner.write().await;

        if inner.digest_index.contains_key(api_key.key_digest()) {
            return Err(DomainError::infrastructure(
                "Digest collision on API key insert",
            ));
        }

        let active = inner
            .keys
            .values()
            .filter(|k| k.owner_id() == api_key.owner_id() && !k.is_revoked())
            .count() as u32;

        if active >= max_active {
            return Err(DomainError::quota_exceeded(format!(
                "Owner already holds {} active API key(s)",
                active
            )));
        }

        inner
            .digest_index
            .insert(api_key.key_digest().to_string(), api_key.id());
        inner.keys.insert(api_key.id(), api_key.clone());

        Ok(api_key)
    }

    async fn find_by_digest(&self, digest: &str) -> Result<Option<ApiKey>, DomainError> {
        let inner = self.inner.read().await;

        Ok(inner
            .digest_index
            .get(digest)
            .and_then(|id| inner.keys.get(id))
            .cloned())
    }

    async fn get(&self, id: ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.keys.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<ApiKey>, DomainError> {
        let inner = self.inner.read().await;

        let mut keys: Vec<ApiKey> = inner
            .keys
            .values()
            .filter(|k| k.owner_id() == owner_id)
            .cloned()
            .collect();

        keys.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(keys)
    }

    async fn revoke(
        &self,
        id: ApiKeyId,
        requesting_owner: &OwnerId,
    ) -> Result<ApiKey, DomainError> {
        let mut inner = self.inner.write().await;

        let key = inner
            .keys
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        if key.owner_id() != requesting_owner {
            return Err(DomainError::forbidden(
                "You can only revoke your own API keys",
            ));
        }

        key.revoke()?;

        Ok(key.clone())
    }

    async fn touch_last_used(&self, id: ApiKeyId) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;

        if let Some(key) = inner.keys.get_mut(&id) {
            key.record_usage();
        }

        Ok(())
    }

    async fn count_active(&self, owner_id: &OwnerId) -> Result<u32, DomainError> {
        let inner = self.inner.read().await;

        Ok(inner
            .keys
            .values()
            .filter(|k| k.owner_id() == owner_id && !k.is_revoked())
            .count() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_key(owner: &str, name: &str, digest: &str) -> ApiKey {
        ApiKey::new(
            ApiKeyId::generate(),
            OwnerId::new(owner),
            name,
            digest,
            "dpx_12345678",
        )
    }

    #[tokio::test]
    async fn test_create_and_find_by_digest() {
        let repo = InMemoryApiKeyRepository::new();
        let key = create_test_key("owner-1", "Key 1", "digest-1");

        repo.create(key.clone(), 1).await.unwrap();

        let found = repo.find_by_digest("digest-1").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id(), key.id());

        let missing = repo.find_by_digest("digest-other").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_create_enforces_quota() {
        let repo = InMemoryApiKeyRepository::new();

        repo.create(create_test_key("owner-1", "Key 1", "digest-1"), 1)
            .await
            .unwrap();

        let result = repo
            .create(create_test_key("owner-1", "Key 2", "digest-2"), 1)
            .await;
        assert!(matches!(result, Err(DomainError::QuotaExceeded { .. })));

        // Nothing was persisted for the failed attempt
        assert_eq!(repo.count_active(&OwnerId::new("owner-1")).await.unwrap(), 1);
        assert!(repo.find_by_digest("digest-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_quota_ignores_revoked_keys() {
        let repo = InMemoryApiKeyRepository::new();
        let owner = OwnerId::new("owner-1");

        let first = repo
            .create(create_test_key("owner-1", "Key 1", "digest-1"), 1)
            .await
            .unwrap();
        repo.revoke(first.id(), &owner).await.unwrap();

        // Revoked key no longer counts against the quota
        repo.create(create_test_key("owner-1", "Key 2", "digest-2"), 1)
            .await
            .unwrap();

        assert_eq!(repo.count_active(&owner).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_quota_is_per_owner() {
        let repo = InMemoryApiKeyRepository::new();

        repo.create(create_test_key("owner-1", "Key 1", "digest-1"), 1)
            .await
            .unwrap();
        repo.create(create_test_key("owner-2", "Key 2", "digest-2"), 1)
            .await
            .unwrap();

        assert_eq!(repo.count_active(&OwnerId::new("owner-1")).await.unwrap(), 1);
        assert_eq!(repo.count_active(&OwnerId::new("owner-2")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_create_single_winner() {
        let repo = Arc::new(InMemoryApiKeyRepository::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.create(
                    create_test_key("owner-1", &format!("Key {}", i), &format!("digest-{}", i)),
                    1,
                )
                .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.count_active(&OwnerId::new("owner-1")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let repo = InMemoryApiKeyRepository::new();

        for i in 0..3 {
            repo.create(
                create_test_key("owner-1", &format!("Key {}", i), &format!("digest-{}", i)),
                10,
            )
            .await
            .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let keys = repo.list_by_owner(&OwnerId::new("owner-1")).await.unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].name(), "Key 2");
        assert_eq!(keys[2].name(), "Key 0");
    }

    #[tokio::test]
    async fn test_revoke_ownership_and_terminal_state() {
        let repo = InMemoryApiKeyRepository::new();
        let owner = OwnerId::new("owner-1");
        let other = OwnerId::new("owner-2");

        let key = repo
            .create(create_test_key("owner-1", "Key 1", "digest-1"), 1)
            .await
            .unwrap();

        // Another owner can't revoke it
        let result = repo.revoke(key.id(), &other).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        // First revoke succeeds, second is an error
        let revoked = repo.revoke(key.id(), &owner).await.unwrap();
        assert!(revoked.is_revoked());

        let second = repo.revoke(key.id(), &owner).await;
        assert!(matches!(second, Err(DomainError::AlreadyRevoked)));
    }

    #[tokio::test]
    async fn test_revoke_unknown_key() {
        let repo = InMemoryApiKeyRepository::new();

        let result = repo
            .revoke(ApiKeyId::generate(), &OwnerId::new("owner-1"))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_touch_last_used() {
        let repo = InMemoryApiKeyRepository::new();
        let key = repo
            .create(create_test_key("owner-1", "Key 1", "digest-1"), 1)
            .await
            .unwrap();

        repo.touch_last_used(key.id()).await.unwrap();

        let fetched = repo.get(key.id()).await.unwrap().unwrap();
        assert!(fetched.last_used_at().is_some());

        // Touching a missing key is a no-op, not an error
        repo.touch_last_used(ApiKeyId::generate()).await.unwrap();
    }
}
