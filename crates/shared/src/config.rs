//! Application configuration management.
//!
//! Layers, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
//! then `SUBLEDGER__SECTION__KEY` environment variables.

use serde::Deserialize;

use crate::types::AMOUNT_SCALE;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SUBLEDGER";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger behaviour.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger behaviour configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Decimal places kept when valuing source documents. At most
    /// [`AMOUNT_SCALE`].
    #[serde(default = "default_valuation_scale")]
    pub valuation_scale: u32,
    /// Attempts made by a settlement before giving up on lock contention.
    #[serde(default = "default_settle_retry_attempts")]
    pub settle_retry_attempts: u32,
}

fn default_valuation_scale() -> u32 {
    2
}

fn default_settle_retry_attempts() -> u32 {
    3
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            valuation_scale: default_valuation_scale(),
            settle_retry_attempts: default_settle_retry_attempts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "subledger=info,sea_orm=warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Loads configuration using files under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the ledger cannot honour.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if `ledger.valuation_scale` exceeds
    /// [`AMOUNT_SCALE`] or `ledger.settle_retry_attempts` is zero.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.ledger.valuation_scale > AMOUNT_SCALE {
            return Err(config::ConfigError::Message(format!(
                "ledger.valuation_scale {} exceeds the stored amount scale {AMOUNT_SCALE}",
                self.ledger.valuation_scale
            )));
        }
        if self.ledger.settle_retry_attempts == 0 {
            return Err(config::ConfigError::Message(
                "ledger.settle_retry_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
