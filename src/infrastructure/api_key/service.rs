//! API key service
//!
//! High-level credential lifecycle operations: generate, validate, list,
//! revoke. Sits between the HTTP handlers and the repository traits.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::domain::account::{Account, AccountRepository, OwnerId, PlanQuotas};
use crate::domain::api_key::{
    validate_expires_in_days, validate_key_name, ApiKey, ApiKeyId, ApiKeyRepository,
};
use crate::domain::DomainError;

use super::generator::{digest_key, is_well_formed, ApiKeyGenerator};

/// Result of creating a new API key
#[derive(Debug)]
pub struct CreateApiKeyResult {
    /// The API key entity (digest only, no secret)
    pub api_key: ApiKey,
    /// The full plaintext secret, returned exactly once
    pub secret: String,
}

/// A successfully validated credential with its owning account
#[derive(Debug)]
pub struct ValidatedKey {
    pub api_key: ApiKey,
    pub account: Account,
}

/// API key service
#[derive(Debug)]
pub struct ApiKeyService {
    keys: Arc<dyn ApiKeyRepository>,
    accounts: Arc<dyn AccountRepository>,
    generator: ApiKeyGenerator,
    quotas: PlanQuotas,
}

impl ApiKeyService {
    pub fn new(
        keys: Arc<dyn ApiKeyRepository>,
        accounts: Arc<dyn AccountRepository>,
        quotas: PlanQuotas,
    ) -> Self {
        Self {
            keys,
            accounts,
            generator: ApiKeyGenerator::new(),
            quotas,
        }
    }

    /// Create a new API key for the given account
    ///
    /// The plan's active-key quota is enforced atomically by the repository;
    /// a rejected create persists nothing.
    pub async fn create(
        &self,
        account: &Account,
        name: &str,
        expires_in_days: Option<u32>,
    ) -> Result<CreateApiKeyResult, DomainError> {
        validate_key_name(name).map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(days) = expires_in_days {
            validate_expires_in_days(days).map_err(|e| DomainError::validation(e.to_string()))?;
        }

        let generated = self.generator.generate();

        let mut api_key = ApiKey::new(
            ApiKeyId::generate(),
            account.id().clone(),
            name,
            &generated.digest,
            &generated.prefix,
        );

        if let Some(days) = expires_in_days {
            api_key = api_key.with_expiration(Utc::now() + Duration::days(days as i64));
        }

        let max_active = self.quotas.max_active_keys(account.plan());
        let created = self.keys.create(api_key, max_active).await?;

        info!(
            owner = %account.id(),
            key_id = %created.id(),
            "API key created"
        );

        Ok(CreateApiKeyResult {
            api_key: created,
            secret: generated.key,
        })
    }

    /// Validate a presented credential and resolve its owning account
    ///
    /// Each rejection reason is a distinct error variant so the API layer can
    /// surface specific messages. Last-used recording is fire-and-forget.
    pub async fn validate(&self, token: &str) -> Result<ValidatedKey, DomainError> {
        if !is_well_formed(token) {
            return Err(DomainError::malformed("Invalid API key format"));
        }

        let digest = digest_key(token);

        let api_key = self
            .keys
            .find_by_digest(&digest)
            .await?
            .ok_or_else(|| DomainError::unauthenticated("API key not found"))?;

        if api_key.is_revoked() {
            debug!(key_id = %api_key.id(), "Rejected revoked API key");
            return Err(DomainError::Revoked);
        }

        if api_key.is_expired() {
            debug!(key_id = %api_key.id(), "Rejected expired API key");
            return Err(DomainError::Expired);
        }

        let account = self
            .accounts
            .get(api_key.owner_id())
            .await?
            .ok_or_else(|| DomainError::unauthenticated("API key not found"))?;

        // Advisory timestamp; never blocks or fails the validation itself
        let keys = Arc::clone(&self.keys);
        let key_id = api_key.id();
        tokio::spawn(async move {
            if let Err(e) = keys.touch_last_used(key_id).await {
                warn!(key_id = %key_id, "Failed to record API key usage: {}", e);
            }
        });

        Ok(ValidatedKey { api_key, account })
    }

    /// List the account's keys, newest first
    pub async fn list(&self, owner_id: &OwnerId) -> Result<Vec<ApiKey>, DomainError> {
        self.keys.list_by_owner(owner_id).await
    }

    /// Revoke one of the requester's keys
    pub async fn revoke(
        &self,
        id: ApiKeyId,
        requesting_owner: &OwnerId,
    ) -> Result<ApiKey, DomainError> {
        let revoked = self.keys.revoke(id, requesting_owner).await?;

        info!(owner = %requesting_owner, key_id = %id, "API key revoked");

        Ok(revoked)
    }
}
