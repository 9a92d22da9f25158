use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

use crate::utils::ValidationPolicy;

#[derive(Debug, Clone)]
pub struct TodoConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub storage: StorageConfig,
    pub validation: ValidationPolicy,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Upper bound on any single database call.
    pub timeout_secs: u64,
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Spans are exported over OTLP only when this is set.
    pub otlp_endpoint: Option<String>,
}

impl TodoConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let timeout_secs = parse_timeout_secs(&get_env("TODO_DB_TIMEOUT_SECS", Some("10"))?)?;

        Ok(TodoConfig {
            common: common_config,
            mongodb: MongoConfig {
                // No fallback endpoint in production.
                uri: Secret::new(get_env(
                    "MONGODB_URI",
                    (!is_prod).then_some("mongodb://localhost:27017"),
                )?),
                database: get_env("MONGODB_DATABASE", Some("todo_db"))?,
                collection: get_env("MONGODB_COLLECTION", Some("todos"))?,
            },
            storage: StorageConfig { timeout_secs },
            validation: ValidationPolicy {
                reject_false_checked: env::var("TODO_REJECT_FALSE_CHECKED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
            observability: ObservabilityConfig {
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => default.map(str::to_string).ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key))
        }),
    }
}

/// A zero budget would fail every database call before it reaches the wire.
fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(AppError::ConfigError(anyhow::anyhow!(
            "TODO_DB_TIMEOUT_SECS must be at least 1"
        ))),
        Ok(secs) => Ok(secs),
        Err(e) => Err(AppError::ConfigError(anyhow::anyhow!(
            "TODO_DB_TIMEOUT_SECS is invalid: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_timeout_defaults_to_ten_seconds() {
        assert_eq!(StorageConfig::default().timeout(), Duration::from_secs(10));
    }

    #[test]
    fn get_env_falls_back_to_default() {
        let value = get_env("TODO_TEST_SURELY_UNSET_VAR", Some("fallback")).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_without_default_is_an_error() {
        let err = get_env("TODO_TEST_SURELY_UNSET_VAR", None).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("TODO_TEST_SURELY_UNSET_VAR is required"));
    }

    #[test]
    fn timeout_accepts_positive_seconds() {
        assert_eq!(parse_timeout_secs("10").unwrap(), 10);
        assert_eq!(parse_timeout_secs("1").unwrap(), 1);
    }

    #[test]
    fn timeout_rejects_zero() {
        let err = parse_timeout_secs("0").unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("must be at least 1"));
    }

    #[test]
    fn timeout_rejects_non_numeric_values() {
        for raw in ["", "ten", "-5", "1.5"] {
            let err = parse_timeout_secs(raw).unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)), "{raw}");
        }
    }
}
