//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CounterBackend, CounterConfig, LogFormat, LoggingConfig, RateLimitConfig,
    ServerConfig, StorageBackend, StorageConfig, TierConfig,
};
