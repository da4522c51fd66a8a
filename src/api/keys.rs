//! Credential validation and key-management endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{bearer_token, RequireOwner};
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::{ApiKey, ApiKeyId};
use crate::infrastructure::api_key::display_prefix;

/// Request to create a new API key
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub expires_in_days: Option<u32>,
}

/// API key metadata as returned by management endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub id: String,
    pub name: String,
    pub key_prefix: String,
    pub revoked: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id().to_string(),
            name: key.name().to_string(),
            key_prefix: key.key_prefix().to_string(),
            revoked: key.is_revoked(),
            created_at: key.created_at().to_rfc3339(),
            expires_at: key.expires_at().map(|dt| dt.to_rfc3339()),
            last_used_at: key.last_used_at().map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Creation response; the only place the plaintext secret ever appears
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,
    pub key: String,
}

/// List response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListApiKeysResponse {
    pub keys: Vec<ApiKeyResponse>,
}

/// Successful validation response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateKeyResponse {
    pub valid: bool,
    pub key_name: String,
    pub key_prefix: String,
    pub user: ValidatedUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedUser {
    pub id: String,
    pub email: String,
    pub username: String,
}

/// GET /api/validate-key
pub async fn validate_key(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ValidateKeyResponse>, ApiError> {
    let token = bearer_token(&headers)?;

    debug!(prefix = %display_prefix(&token), "Validating presented API key");

    let validated = state
        .api_key_service
        .validate(&token)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ValidateKeyResponse {
        valid: true,
        key_name: validated.api_key.name().to_string(),
        key_prefix: validated.api_key.key_prefix().to_string(),
        user: ValidatedUser {
            id: validated.account.id().to_string(),
            email: validated.account.email().to_string(),
            username: validated.account.username().to_string(),
        },
    }))
}

/// POST /api/keys
pub async fn create_api_key(
    State(state): State<AppState>,
    RequireOwner(account): RequireOwner,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<CreateApiKeyResponse>), ApiError> {
    debug!(owner = %account.id(), name = %request.name, "Creating API key");

    let created = state
        .api_key_service
        .create(&account, &request.name, request.expires_in_days)
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateApiKeyResponse {
            api_key: ApiKeyResponse::from(&created.api_key),
            key: created.secret,
        }),
    ))
}

/// GET /api/keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    RequireOwner(account): RequireOwner,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    let keys = state
        .api_key_service
        .list(account.id())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListApiKeysResponse {
        keys: keys.iter().map(ApiKeyResponse::from).collect(),
    }))
}

/// POST /api/keys/{id}/revoke
pub async fn revoke_api_key(
    State(state): State<AppState>,
    RequireOwner(account): RequireOwner,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let id = ApiKeyId::parse(&key_id).map_err(ApiError::from)?;

    let revoked = state
        .api_key_service
        .revoke(id, account.id())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiKeyResponse::from(&revoked)))
}
