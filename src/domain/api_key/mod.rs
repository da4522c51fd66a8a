//! API Key domain
//!
//! Domain types and traits for the credential lifecycle: issuance,
//! digest-based lookup, revocation, and expiry.

mod entity;
mod repository;
mod validation;

pub use entity::{ApiKey, ApiKeyId};
pub use repository::ApiKeyRepository;
pub use validation::{validate_expires_in_days, validate_key_name, ApiKeyValidationError};
