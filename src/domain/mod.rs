//! Domain layer - Core business logic and entities

pub mod account;
pub mod api_key;
pub mod counter;
pub mod error;
pub mod rate_limit;

pub use account::{Account, AccountRepository, OwnerId, Plan, PlanQuotas};
pub use api_key::{
    validate_expires_in_days, validate_key_name, ApiKey, ApiKeyId, ApiKeyRepository,
    ApiKeyValidationError,
};
pub use counter::{CounterSample, CounterStore};
pub use error::DomainError;
pub use rate_limit::{Identity, KeyingStrategy, PolicyTable, RateLimitPolicy, RouteClass};
