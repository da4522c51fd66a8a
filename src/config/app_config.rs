use std::time::Duration;

use serde::Deserialize;

use crate::domain::account::PlanQuotas;
use crate::domain::rate_limit::PolicyTable;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub counter: CounterConfig,
    pub rate_limit: RateLimitConfig,
    pub quotas: PlanQuotas,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Key metadata persistence backend
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Connection string; DATABASE_URL wins when both are set
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

/// Rate-limit counter backend
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub backend: CounterBackend,
    pub redis_url: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CounterBackend {
    #[default]
    Memory,
    Redis,
}

/// Per-tier window and ceiling overrides
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub auth: Option<TierConfig>,
    pub payment: Option<TierConfig>,
    pub ai: Option<TierConfig>,
    pub upload: Option<TierConfig>,
    pub general: Option<TierConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TierConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl RateLimitConfig {
    /// Build the effective policy table: defaults overlaid with any
    /// configured tier overrides. Keying strategies and bypass paths are
    /// fixed per tier, not configurable.
    pub fn to_policy_table(&self) -> PolicyTable {
        let mut table = PolicyTable::default();

        for (tier, policy) in [
            (self.auth, &mut table.auth),
            (self.payment, &mut table.payment),
            (self.ai, &mut table.ai),
            (self.upload, &mut table.upload),
            (self.general, &mut table.general),
        ] {
            if let Some(tier) = tier {
                policy.window = Duration::from_secs(tier.window_secs);
                policy.max_requests = tier.max_requests;
            }
        }

        table
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            backend: CounterBackend::default(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
