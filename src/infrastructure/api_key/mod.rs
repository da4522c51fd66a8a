//! API key infrastructure: generation, persistence, lifecycle service

pub mod generator;
pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use generator::{digest_key, display_prefix, is_well_formed, ApiKeyGenerator, GeneratedApiKey};
pub use postgres_repository::PostgresApiKeyRepository;
pub use repository::InMemoryApiKeyRepository;
pub use service::{ApiKeyService, CreateApiKeyResult, ValidatedKey};
