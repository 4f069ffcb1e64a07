//! Application configuration module
//!
//! Configuration is read from environment variables with the `COURSEMATES`
//! prefix; nested values are separated by `__`.
//!
//! # Example
//!
//! ```no_run
//! use coursemates::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod cache;
mod database;
mod error;
mod logging;
mod redis;
mod terms;

pub use cache::MutualCourseCacheConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use redis::RedisConfig;
pub use terms::TermConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection (users, course history, catalog)
    pub database: DatabaseConfig,

    /// Redis connection (mutual-course cache)
    pub redis: RedisConfig,

    #[serde(default)]
    pub cache: MutualCourseCacheConfig,

    #[serde(default)]
    pub terms: TermConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `COURSEMATES__SECTION__KEY`
    /// variables, e.g. `COURSEMATES__DATABASE__URL=...` -> `database.url`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COURSEMATES")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.redis.validate()?;
        self.cache.validate()?;
        self.terms.validate()?;
        Ok(())
    }
}
