//! Application configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

use bookvault_db::DbConfig;

const DEV_JWT_SECRET: &str = "bookvault-dev-secret-change-in-production";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite file path, or `:memory:`
    pub database_path: String,

    /// Pool size for file databases
    pub db_max_connections: u32,

    /// HS256 signing secret
    pub jwt_secret: String,

    /// Token lifetime in seconds (default: 24h)
    pub jwt_lifetime_secs: i64,

    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count
    pub argon2_iterations: u32,

    /// Reject administrative status updates that skip the lifecycle
    pub strict_status_transitions: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if secret.trim().is_empty() => {
                return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
            }
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let config = AppConfig {
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "./bookvault.db".to_string()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            jwt_lifetime_secs: parse_or(&lookup, "JWT_LIFETIME_SECS", 86_400)?,
            argon2_memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", 19_456)?,
            argon2_iterations: parse_or(&lookup, "ARGON2_ITERATIONS", 2)?,
            strict_status_transitions: parse_or(&lookup, "STRICT_STATUS_TRANSITIONS", false)?,
        };

        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// In-memory database, fixed secret and the cheapest argon2 parameters.
    /// For tests and local experiments only.
    pub fn in_memory() -> Self {
        AppConfig {
            database_path: ":memory:".to_string(),
            db_max_connections: 1,
            jwt_secret: "in-memory-test-secret".to_string(),
            jwt_lifetime_secs: 86_400,
            argon2_memory_kib: argon2::Params::MIN_M_COST,
            argon2_iterations: 1,
            strict_status_transitions: false,
        }
    }

    /// Pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
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

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_from(lookup(&[])).unwrap();
        assert_eq!(config.database_path, "./bookvault.db");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.jwt_lifetime_secs, 86_400);
        assert_eq!(config.argon2_memory_kib, 19_456);
        assert_eq!(config.argon2_iterations, 2);
        assert!(!config.strict_status_transitions);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::load_from(lookup(&[
            ("DATABASE_PATH", "/var/lib/bookvault.db"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_LIFETIME_SECS", "600"),
            ("STRICT_STATUS_TRANSITIONS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, "/var/lib/bookvault.db");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_lifetime_secs, 600);
        assert!(config.strict_status_transitions);
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::load_from(lookup(&[("DB_MAX_CONNECTIONS", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "DB_MAX_CONNECTIONS"));

        let err = AppConfig::load_from(lookup(&[("JWT_LIFETIME_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = AppConfig::load_from(lookup(&[("STRICT_STATUS_TRANSITIONS", "yes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = AppConfig::load_from(lookup(&[("JWT_SECRET", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }

    #[test]
    fn test_db_config() {
        assert!(AppConfig::in_memory().db_config().is_in_memory());

        let config = AppConfig::load_from(lookup(&[("DB_MAX_CONNECTIONS", "8")])).unwrap();
        let db = config.db_config();
        assert!(!db.is_in_memory());
        assert_eq!(db.max_connections, 8);
    }
}
