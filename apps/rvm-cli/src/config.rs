//! CLI configuration.
//!
//! Loaded from environment variables (after `.env`, if present) with fallback
//! to defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Deployment environment, selects the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Production,
    Development,
}

impl FromStr for AppEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(AppEnv::Production),
            "development" | "dev" => Ok(AppEnv::Development),
            _ => Err(ConfigError::InvalidValue("APP_ENV".to_string())),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database file
    pub database_file_path: PathBuf,

    /// Production or development
    pub app_env: AppEnv,

    /// Pool size
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = AppConfig {
            database_file_path: lookup("DATABASE_FILE_PATH")
                .unwrap_or_else(|| "./data.db".to_string())
                .into(),

            app_env: lookup("APP_ENV")
                .unwrap_or_else(|| "production".to_string())
                .parse()?,

            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,
        };

        if config.database_file_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("DATABASE_FILE_PATH".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_file_path, PathBuf::from("./data.db"));
        assert_eq!(config.app_env, AppEnv::Production);
        assert_eq!(config.db_max_connections, 5);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_FILE_PATH", "/var/lib/rvm/ledger.db"),
            ("APP_ENV", "development"),
            ("DB_MAX_CONNECTIONS", "2"),
        ])
        .unwrap();
        assert_eq!(config.database_file_path, PathBuf::from("/var/lib/rvm/ledger.db"));
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.db_max_connections, 2);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("APP_ENV", "staging")]),
            Err(ConfigError::InvalidValue(v)) if v == "APP_ENV"
        ));
        assert!(matches!(
            load(&[("DB_MAX_CONNECTIONS", "many")]),
            Err(ConfigError::InvalidValue(v)) if v == "DB_MAX_CONNECTIONS"
        ));
        assert!(matches!(
            load(&[("DATABASE_FILE_PATH", "")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }
}
