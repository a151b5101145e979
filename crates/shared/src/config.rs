//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Exchange run configuration.
    #[serde(default)]
    pub exchange: ExchangeConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "till=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

/// Exchange run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Path of the TOML file listing per-location requests.
    #[serde(default = "default_batch_file")]
    pub batch_file: String,
    /// Optional TOML file replacing the standard band policy.
    #[serde(default)]
    pub policy_file: Option<String>,
}

fn default_batch_file() -> String {
    "batch.toml".to_string()
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            batch_file: default_batch_file(),
            policy_file: None,
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
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TILL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            ["TILL__LOGGING__FILTER", "TILL__EXCHANGE__BATCH_FILE", "TILL__EXCHANGE__POLICY_FILE"],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.logging.filter, "till=info");
                assert!(!config.logging.json);
                assert_eq!(config.exchange.batch_file, "batch.toml");
                assert!(config.exchange.policy_file.is_none());
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("TILL__LOGGING__FILTER", Some("till=debug")),
                ("TILL__EXCHANGE__BATCH_FILE", Some("eod.toml")),
                ("TILL__EXCHANGE__POLICY_FILE", Some("bands.toml")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.logging.filter, "till=debug");
                assert_eq!(config.exchange.batch_file, "eod.toml");
                assert_eq!(config.exchange.policy_file.as_deref(), Some("bands.toml"));
            },
        );
    }
}
