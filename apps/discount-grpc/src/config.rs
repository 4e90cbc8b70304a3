//! Discount service configuration module.
//!
//! ## Sources
//! Later sources override earlier ones:
//! ```text
//! 1. Built-in defaults              (DiscountConfig::default)
//! 2. ./discount.toml                (optional)
//! 3. Path passed to load_from       (first CLI argument of the server)
//! 4. File named by DISCOUNT_CONFIG  (required when the variable is set)
//! 5. DISCOUNT_* environment         (DISCOUNT_GRPC_PORT=6000, ...)
//! ```

use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat};
use eshop_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming an extra config file.
pub const CONFIG_ENV_VAR: &str = "DISCOUNT_CONFIG";

/// Prefix for environment overrides.
pub const CONFIG_ENV_PREFIX: &str = "DISCOUNT";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "discount.toml";

/// Discount service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscountConfig {
    /// gRPC server port
    pub grpc_port: u16,

    /// SQLite database file (`:memory:` for a throwaway store)
    pub database_path: String,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Apply pending migrations on startup
    pub run_migrations: bool,

    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,

    /// Seconds between Watch health updates
    pub health_check_interval_secs: u64,

    /// Insert the development coupon set on startup
    pub seed_on_startup: bool,
}

impl Default for DiscountConfig {
    fn default() -> Self {
        DiscountConfig {
            grpc_port: 5052,
            database_path: "./discount.db".to_string(),
            max_connections: 5,
            run_migrations: true,
            log_filter: "info,eshop_db=debug,discount_grpc=debug,sqlx=warn".to_string(),
            health_check_interval_secs: 10,
            seed_on_startup: false,
        }
    }
}

impl DiscountConfig {
    /// Load configuration from the default file locations and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding `path` after `discount.toml`.
    pub fn load_from(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Toml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Toml).required(true));
        }

        let config: DiscountConfig = builder
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grpc_port == 0 {
            return Err(ConfigError::InvalidValue("grpc_port".to_string()));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }

        if self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }

        if self.health_check_interval_secs == 0 {
            return Err(ConfigError::InvalidValue("health_check_interval_secs".to_string()));
        }

        Ok(())
    }

    /// Database pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .run_migrations(self.run_migrations)
    }

    /// Interval between Watch health updates.
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiscountConfig::default();

        assert_eq!(config.grpc_port, 5052);
        assert_eq!(config.database_path, "./discount.db");
        assert!(config.run_migrations);
        assert!(!config.seed_on_startup);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let bad_port = DiscountConfig {
            grpc_port: 0,
            ..DiscountConfig::default()
        };
        assert!(matches!(bad_port.validate(), Err(ConfigError::InvalidValue(_))));

        let no_connections = DiscountConfig {
            max_connections: 0,
            ..DiscountConfig::default()
        };
        assert!(no_connections.validate().is_err());

        let no_path = DiscountConfig {
            database_path: " ".to_string(),
            ..DiscountConfig::default()
        };
        assert!(matches!(no_path.validate(), Err(ConfigError::MissingRequired(_))));

        let no_interval = DiscountConfig {
            health_check_interval_secs: 0,
            ..DiscountConfig::default()
        };
        assert!(no_interval.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("discount-test-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "grpc_port = 6000\ndatabase_path = \":memory:\"\nseed_on_startup = true\n",
        )
        .unwrap();

        let config = DiscountConfig::load_from(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.grpc_port, 6000);
        assert_eq!(config.database_path, ":memory:");
        assert!(config.seed_on_startup);
        // Untouched keys keep their defaults
        assert_eq!(config.max_connections, 5);
        assert!(config.db_config().is_in_memory());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        assert!(matches!(
            DiscountConfig::load_from(Some("/nonexistent/discount-config.toml")),
            Err(ConfigError::Load(_))
        ));
    }
}
