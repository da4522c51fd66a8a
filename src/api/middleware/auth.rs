//! Bearer credential extraction

use axum::http::{header, HeaderMap};

use crate::api::types::ApiError;

/// Pull the API key out of the `Authorization: Bearer <key>` header
///
/// The two failure modes get distinct messages so callers can tell a missing
/// header from a wrong scheme.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Authorization header required"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header encoding"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use the Bearer scheme"))?;

    Ok(token.trim().to_string())
}
