use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::core::corpus::error::CorpusError;
use crate::core::corpus::fetch::RetryPolicy;
use crate::core::corpus::resolver::ResolverConfig;
use crate::core::corpus::source::SourceConfig;
use crate::core::logging::LoggingConfig;

/// Environment variable prefix; `__` separates nested keys
/// (`PREVNET_FETCH__MAX_RETRIES=3`).
pub const ENV_PREFIX: &str = "PREVNET_";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Which backing source the Record Store reads from.
    pub source: SourceConfig,
    /// Retry policy shared by every remote request.
    pub fetch: RetryPolicy,
    pub resolver: ResolverConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `~/.config/prevnet/config.toml` and the
    /// environment. Returns `Default` if loading fails.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match Self::load_from(&config_path) {
            Ok(config) => {
                log::debug!("Loaded config (file: {})", config_path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to load config at {}: {e}; using defaults", config_path.display());
                Self::default()
            }
        }
    }

    /// Defaults, then the TOML file at `path` if it exists, then `PREVNET_*`
    /// environment variables.
    pub fn load_from(path: &Path) -> Result<Self, CorpusError> {
        let config = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("prevnet").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
