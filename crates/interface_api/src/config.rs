//! API configuration

use std::time::Duration;

use core_kernel::{MoneyError, RaiseRate};
use infra_db::DatabaseConfig;
use rust_decimal::Decimal;
use serde::Deserialize;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/payroll";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Raise applied by every salary endpoint, in percent
    pub raise_percent: Decimal,
    /// Maximum database connections
    pub max_connections: u32,
    /// Database connections kept open while idle
    pub min_connections: u32,
    /// Seconds a request waits for a free database connection
    pub acquire_timeout_secs: u64,
    /// Apply the bundled migrations on startup
    pub run_migrations: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            raise_percent: Decimal::TEN,
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_secs: 30,
            run_migrations: false,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    ///
    /// `API_*` variables win; `DATABASE_URL` and `RUST_LOG` are honoured as
    /// fallbacks for the database URL and log level.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Loads configuration from an explicit set of variables
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let database_url = vars
            .get("DATABASE_URL")
            .cloned()
            .unwrap_or(defaults.database_url);
        let log_level = vars.get("RUST_LOG").cloned().unwrap_or(defaults.log_level);

        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", database_url)?
            .set_default("log_level", log_level)?
            .set_default("log_format", "text")?
            .set_default("raise_percent", defaults.raise_percent.to_string())?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("min_connections", i64::from(defaults.min_connections))?
            .set_default("acquire_timeout_secs", defaults.acquire_timeout_secs as i64)?
            .set_default("run_migrations", defaults.run_migrations)?
            .add_source(
                config::Environment::with_prefix("API")
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for the configured database
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }

    /// The configured raise as a multiplier
    pub fn raise_rate(&self) -> Result<RaiseRate, MoneyError> {
        RaiseRate::from_percent(self.raise_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.raise_rate().unwrap(), RaiseRate::default());
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_prefixed_variables_override() {
        let config = ApiConfig::from_vars(vars(&[
            ("API_PORT", "9090"),
            ("API_RAISE_PERCENT", "25"),
            ("API_LOG_FORMAT", "json"),
            ("API_RUN_MIGRATIONS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.raise_percent, dec!(25));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_pool_settings_reach_database_config() {
        let config = ApiConfig::from_vars(vars(&[
            ("API_MAX_CONNECTIONS", "4"),
            ("API_MIN_CONNECTIONS", "1"),
            ("API_ACQUIRE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        let database = config.database_config();
        assert_eq!(database.url, DEFAULT_DATABASE_URL);
        assert_eq!(database.max_connections, 4);
        assert_eq!(database.min_connections, 1);
        assert_eq!(database.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_database_url_fallback() {
        let config =
            ApiConfig::from_vars(vars(&[("DATABASE_URL", "postgres://db/payroll")])).unwrap();
        assert_eq!(config.database_url, "postgres://db/payroll");

        let config = ApiConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://db/payroll"),
            ("API_DATABASE_URL", "postgres://other/payroll"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "postgres://other/payroll");
    }

    #[test]
    fn test_non_positive_raise_is_rejected() {
        let config = ApiConfig {
            raise_percent: dec!(-100),
            ..ApiConfig::default()
        };
        assert!(config.raise_rate().is_err());
    }
}
