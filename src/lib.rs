//! Depaxiom API gateway
//!
//! Credential lifecycle and request admission for the public API:
//! - API key issuance, validation, listing, and revocation
//! - Per-plan active-key quotas
//! - Tiered fixed-window rate limiting over a shared counter store

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use config::{CounterBackend, StorageBackend};
use domain::account::{Account, OwnerId, Plan};
use domain::api_key::ApiKeyRepository;
use domain::counter::CounterStore;
use infrastructure::account::InMemoryAccountRepository;
use infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository, PostgresApiKeyRepository};
use infrastructure::counter::{InMemoryCounterStore, RedisCounterStore};
use infrastructure::rate_limit::RateLimiter;

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    // Accounts mirror the upstream auth/billing system; until that sync
    // exists they are seeded at startup.
    let accounts = Arc::new(InMemoryAccountRepository::new());
    for account in default_accounts() {
        accounts.insert(account);
    }

    let keys: Arc<dyn ApiKeyRepository> = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory key storage");
            Arc::new(InMemoryApiKeyRepository::new())
        }
        StorageBackend::Postgres => {
            let url = std::env::var("DATABASE_URL")
                .ok()
                .or_else(|| config.storage.database_url.clone())
                .ok_or_else(|| {
                    anyhow::anyhow!("DATABASE_URL is required for the postgres storage backend")
                })?;

            info!("Connecting to PostgreSQL...");
            let pool = sqlx::PgPool::connect(&url).await?;
            let repo = PostgresApiKeyRepository::new(pool);
            repo.ensure_schema().await?;
            info!("PostgreSQL key storage ready");

            Arc::new(repo)
        }
    };

    let counters: Arc<dyn CounterStore> = match config.counter.backend {
        CounterBackend::Memory => {
            info!("Using in-memory rate-limit counters");
            Arc::new(InMemoryCounterStore::new())
        }
        CounterBackend::Redis => {
            info!("Connecting to Redis for rate-limit counters...");
            let store = RedisCounterStore::connect(&config.counter.redis_url).await?;
            info!("Redis counter store ready");
            Arc::new(store)
        }
    };

    let api_key_service = Arc::new(ApiKeyService::new(
        keys,
        accounts.clone(),
        config.quotas,
    ));

    let rate_limiter = Arc::new(RateLimiter::new(
        counters,
        config.rate_limit.to_policy_table(),
    ));

    Ok(AppState::new(api_key_service, accounts, rate_limiter))
}

fn default_accounts() -> Vec<Account> {
    vec![
        Account::new(
            OwnerId::new("demo-free"),
            "free@example.com",
            "demo-free",
            Plan::Free,
        ),
        Account::new(
            OwnerId::new("demo-pro"),
            "pro@example.com",
            "demo-pro",
            Plan::Pro,
        ),
        Account::new(
            OwnerId::new("demo-business"),
            "business@example.com",
            "demo-business",
            Plan::Business,
        ),
    ]
}
