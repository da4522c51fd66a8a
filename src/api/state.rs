//! Application state for shared services

use std::sync::Arc;

use crate::domain::account::AccountRepository;
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::rate_limit::RateLimiter;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<ApiKeyService>,
    pub accounts: Arc<dyn AccountRepository>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        api_key_service: Arc<ApiKeyService>,
        accounts: Arc<dyn AccountRepository>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            api_key_service,
            accounts,
            rate_limiter,
        }
    }
}
