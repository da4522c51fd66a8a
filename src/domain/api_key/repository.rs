//! API key repository trait definition

use async_trait::async_trait;

use super::entity::{ApiKey, ApiKeyId};
use crate::domain::account::OwnerId;
use crate::domain::DomainError;

/// Durable store of hashed credentials and their metadata
///
/// Implementations own the uniqueness and ownership invariants: digests are
/// unique across all keys, and the active-key quota is enforced atomically
/// inside `create` rather than by a separate count-then-insert.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + std::fmt::Debug {
    /// Insert a new key iff the owner holds fewer than `max_active`
    /// non-revoked keys
    ///
    /// The count-check and insert execute as one atomic unit; concurrent
    /// creation attempts from the same owner cannot both succeed past the
    /// quota. Fails with `QuotaExceeded` when the quota is already met.
    async fn create(&self, api_key: ApiKey, max_active: u32) -> Result<ApiKey, DomainError>;

    /// Look up a key by its secret digest; the hot path for validation
    async fn find_by_digest(&self, digest: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Look up a key by id
    async fn get(&self, id: ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// List an owner's keys, newest first
    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<ApiKey>, DomainError>;

    /// Revoke a key on behalf of `requesting_owner`
    ///
    /// Fails with `NotFound` if no such key, `Forbidden` if the requester
    /// does not own it, `AlreadyRevoked` on a second call. Returns the
    /// updated key.
    async fn revoke(
        &self,
        id: ApiKeyId,
        requesting_owner: &OwnerId,
    ) -> Result<ApiKey, DomainError>;

    /// Best-effort update of the advisory `last_used_at` timestamp
    ///
    /// Last-write-wins under concurrency; failures are the caller's to log
    /// and ignore.
    async fn touch_last_used(&self, id: ApiKeyId) -> Result<(), DomainError>;

    /// Count the owner's non-revoked keys
    async fn count_active(&self, owner_id: &OwnerId) -> Result<u32, DomainError>;
}
