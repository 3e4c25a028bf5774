use std::fs;
use std::net::IpAddr;
use std::path::Path;

use log::info;
use reqwest::Url;
use serde::Deserialize;

use super::types::*;
use crate::error_handling::types::ConfigError;

/// Environment variable overriding `alertmanager_api` from the file.
pub const ALERTMANAGER_API_ENV: &str = "SILENCE_SCHEDULER_ALERTMANAGER_API";

/// Application configuration loaded from a TOML file.
///
/// ```toml
/// alertmanager_api = "http://localhost:9093/api/v2"
///
/// [web]
/// bind_address = "0.0.0.0"
/// port = 8080
///
/// [client]
/// request_timeout_secs = 10
/// ```
///
/// # Fields Overview
///
/// - `alertmanager_api`: base URL of the Alertmanager v2 API, required
/// - `web`: listen address and port of the HTTP interface
/// - `client`: behaviour of the backend client (per-call timeout)
#[derive(Debug, PartialEq, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub alertmanager_api: String,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Reads, overrides from the environment, and validates a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.apply_env();
        config.validate()?;

        info!("Config loaded, path: {}", path.display());
        Ok(config)
    }

    /// Parses TOML content without validating it.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    fn apply_env(&mut self) {
        if let Ok(api) = std::env::var(ALERTMANAGER_API_ENV) {
            if !api.trim().is_empty() {
                info!("Using Alertmanager API from {}", ALERTMANAGER_API_ENV);
                self.alertmanager_api = api.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alertmanager_api.trim().is_empty() {
            return Err(ConfigError::MissingField("alertmanager_api".to_string()));
        }

        let url = Url::parse(&self.alertmanager_api)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.alertmanager_api, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                self.alertmanager_api
            )));
        }

        self.web.bind_address.parse::<IpAddr>().map_err(|e| {
            ConfigError::BadIPFormatting(format!("web.bind_address {}: {}", self.web.bind_address, e))
        })?;

        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.client.request_timeout_secs) {
            return Err(ConfigError::NotInRange(format!(
                "client.request_timeout_secs must be between 1 and {}, got {}",
                MAX_REQUEST_TIMEOUT_SECS, self.client.request_timeout_secs
            )));
        }
        Ok(())
    }
}
