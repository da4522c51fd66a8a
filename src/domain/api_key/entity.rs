//! API Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::OwnerId;
use crate::domain::DomainError;

/// API Key identifier - a UUID, stable for the lifetime of the key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(Uuid);

impl ApiKeyId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::validation(format!("Invalid API key ID: '{}'", value)))
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// API Key entity
///
/// The credential's plaintext exists only transiently at creation; the entity
/// carries the SHA-256 digest and a non-secret display prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier for the key
    id: ApiKeyId,
    /// Account that owns this key
    owner_id: OwnerId,
    /// Display name, 1-100 characters
    name: String,
    /// SHA-256 hex digest of the full secret - never exposed in API responses
    #[serde(skip_serializing)]
    key_digest: String,
    /// First 12 characters of the plaintext, retained for display only
    key_prefix: String,
    /// Whether the key has been revoked (monotonic, false -> true only)
    revoked: bool,
    /// Expiration timestamp (None = never expires)
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    /// Last successful validation, advisory telemetry only
    #[serde(skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new active API key
    pub fn new(
        id: ApiKeyId,
        owner_id: OwnerId,
        name: impl Into<String>,
        key_digest: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
            key_digest: key_digest.into(),
            key_prefix: key_prefix.into(),
            revoked: false,
            expires_at: None,
            last_used_at: None,
            created_at: Utc::now(),
        }
    }

    /// Set expiration
    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Reconstruct an entity from stored fields
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ApiKeyId,
        owner_id: OwnerId,
        name: String,
        key_digest: String,
        key_prefix: String,
        revoked: bool,
        expires_at: Option<DateTime<Utc>>,
        last_used_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            key_digest,
            key_prefix,
            revoked,
            expires_at,
            last_used_at,
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> ApiKeyId {
        self.id
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_digest(&self) -> &str {
        &self.key_digest
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Status checks

    /// Check if the key has passed its expiration timestamp
    ///
    /// Expiry is re-evaluated at each validation, not a stored transition.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }

    /// Check if the key is currently usable for authentication
    pub fn is_active(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    // Mutators

    /// Revoke the key; terminal, a second call is an error
    pub fn revoke(&mut self) -> Result<(), DomainError> {
        if self.revoked {
            return Err(DomainError::AlreadyRevoked);
        }

        self.revoked = true;
        Ok(())
    }

    /// Record a successful validation
    pub fn record_usage(&mut self) {
        self.last_used_at = Some(Utc::now());
    }
}
