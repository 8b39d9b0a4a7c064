//! Client configuration: which OpenDSM host a session talks to.
//!
//! Resolution order used by [`ClientConfig::from_env`]:
//! 1. `OPENDSM_HOST` (after loading `.env`, if present)
//! 2. the build default ([`DEFAULT_HOST`])

use crate::DEFAULT_HOST;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "opendsm.json";

pub const HOST_ENV_VAR: &str = "OPENDSM_HOST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Build config from the process environment.
    ///
    /// Loads `.env` from the working directory first (non-fatal if missing).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if `OPENDSM_HOST` is set to an invalid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();

        let config = match env::var(HOST_ENV_VAR) {
            Ok(host) => {
                debug!("Using host from {HOST_ENV_VAR}");
                Self::new(host)
            }
            Err(_) => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from {config_dir}/opendsm.json.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is corrupted or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ClientConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the host is empty, not http(s), or not a URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "host cannot be empty".to_string(),
            });
        }

        if !self.host.starts_with("http://") && !self.host.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid URL format: {}", self.host),
            });
        }

        Url::parse(&self.host).map_err(|e| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid URL {}: {e}", self.host),
        })?;

        Ok(())
    }
}

/// Load `.env` from the working directory if one exists.
pub(crate) fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Failed to load .env file: {e}"),
    }
}
