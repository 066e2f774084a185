pub mod engine;
pub mod log;
pub mod source;

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

pub use engine::FlowEngineConfig;
pub use log::LoggingConfig;
pub use source::EsploraConfig;

use crate::constants::ENV_DUST_THRESHOLD;
use crate::constants::ENV_ESPLORA_URL;
use crate::constants::ENV_MAX_TRANSACTIONS;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: FlowEngineConfig,
    pub source: EsploraConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.max_transactions_per_query == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.max_transactions_per_query",
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.source.rate_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.rate_limit",
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "source.base_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Apply `MIZAN_*` environment overrides on top of the file values
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(dust) = env_value::<u64>(ENV_DUST_THRESHOLD)? {
            debug!("config_env_override::{}::{}", ENV_DUST_THRESHOLD, dust);
            self.engine.dust_threshold_satoshis = dust;
        }
        if let Some(limit) = env_value::<usize>(ENV_MAX_TRANSACTIONS)? {
            debug!("config_env_override::{}::{}", ENV_MAX_TRANSACTIONS, limit);
            self.source.max_transactions_per_query = limit;
        }
        if let Ok(url) = std::env::var(ENV_ESPLORA_URL) {
            debug!("config_env_override::{}::{}", ENV_ESPLORA_URL, url);
            self.source.base_url = url;
        }
        Ok(())
    }
}

fn env_value<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| ConfigError::InvalidValue {
            field: key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(None),
    }
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(config_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load `Config.toml`, layer `.env` and environment overrides on top, then validate.
/// A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> crate::Result<Config> {
    let path = path.as_ref();
    dotenvy::dotenv().ok();

    let mut config = if path.exists() {
        let config_str =
            std::fs::read_to_string(path).map_err(|e| ConfigError::OpenFileError(format!("{}: {}", path.display(), e)))?;
        parse_config(&config_str)?
    } else {
        debug!("config_file_missing::{}::using_defaults", path.display());
        Config::default()
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}
