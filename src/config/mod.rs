//! Engine configuration
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `PERIODIZATION` prefix
//! and `__` between nested keys. Every value has a default, so an empty
//! environment yields a working in-process setup.
//!
//! # Example
//!
//! ```no_run
//! use periodization_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Plan API at {}", config.api.base_url());
//! ```

mod api;
mod cache;
mod cloning;
mod error;
mod logging;
mod metrics;

pub use api::ApiConfig;
pub use cache::CacheConfig;
pub use cloning::CloningConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use metrics::MetricsConfig;

use serde::Deserialize;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// External plan API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// New-week construction defaults
    #[serde(default)]
    pub cloning: CloningConfig,

    /// Student read-path cache
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PERIODIZATION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `PERIODIZATION__API__BASE_URL=https://...` -> `api.base_url`
    /// - `PERIODIZATION__CACHE__TTL_SECS=60` -> `cache.ttl_secs = 60`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PERIODIZATION")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` for semantically invalid values.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.cloning.validate()?;
        self.cache.validate()?;
        self.metrics.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
