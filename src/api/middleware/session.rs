//! Session-derived owner extraction for key-management routes
//!
//! The gateway sits behind a session-terminating proxy that asserts the
//! caller's account id in the X-Session-User header. Management handlers
//! trust that header and resolve the account through the repository.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::account::{Account, OwnerId};

pub const SESSION_USER_HEADER: &str = "x-session-user";

/// Extractor requiring an authenticated account on management routes
#[derive(Debug, Clone)]
pub struct RequireOwner(pub Account);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let owner_id = session_owner(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        debug!(owner = %owner_id, "Resolving session account");

        let account = state
            .accounts
            .get(&owner_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::unauthorized("Unknown account"))?;

        Ok(RequireOwner(account))
    }
}

/// Read the asserted owner id from the session header, if present
pub fn session_owner(headers: &axum::http::HeaderMap) -> Option<OwnerId> {
    let value = headers.get(SESSION_USER_HEADER)?.to_str().ok()?.trim();

    if value.is_empty() {
        None
    } else {
        Some(OwnerId::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    #[test]
    fn test_session_owner_present() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_USER_HEADER, "owner-1".parse().unwrap());

        assert_eq!(session_owner(&headers), Some(OwnerId::new("owner-1")));
    }

    #[test]
    fn test_session_owner_missing_or_blank() {
        assert_eq!(session_owner(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(SESSION_USER_HEADER, "   ".parse().unwrap());
        assert_eq!(session_owner(&headers), None);
    }
}
