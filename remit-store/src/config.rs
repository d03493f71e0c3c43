//! Configuration management.
//!
//! The gateway location and client tuning knobs are resolved once at
//! startup: file values first, then environment overrides.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::persistence::{default_config_path, write_atomic};

/// Environment variable overriding the gateway URL.
pub const GATEWAY_URL_ENV: &str = "REMIT_GATEWAY_URL";

/// Where the access token is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenBackend {
    /// In the JSON storage file next to the profile.
    #[default]
    File,
    /// In the system keychain.
    Keychain,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gateway root, without the API prefix.
    pub gateway_url: String,
    /// API version prefix appended to the gateway root.
    pub api_prefix: String,
    /// Delay before the single transport retry, in milliseconds.
    pub retry_backoff_ms: u64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Name of the cookie carrying the CSRF token.
    pub csrf_cookie: String,
    /// IP geolocation endpoint used for the device country.
    pub geolocation_url: String,
    /// Where the access token is stored.
    pub token_backend: TokenBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            retry_backoff_ms: 1000,
            request_timeout_secs: 30,
            csrf_cookie: "csrf_token".to_string(),
            geolocation_url: "https://ipapi.co/json/".to_string(),
            token_backend: TokenBackend::File,
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path and applies environment
    /// overrides.
    pub fn load() -> Result<Self, StoreError> {
        Ok(Self::load_from(&Self::default_path())?.with_env_overrides())
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Applies environment overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = std::env::var(GATEWAY_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty())
        {
            debug!(gateway_url = %url, "Gateway URL overridden from environment");
            self.gateway_url = url;
        }
        self
    }

    /// Saves configuration to the default path.
    pub fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path())
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(self)?;
        write_atomic(path, &content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Sets a field from its key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for unknown keys or unparsable values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let parse_u64 = |v: &str| {
            v.parse::<u64>()
                .map_err(|e| StoreError::Config(format!("{key}: {e}")))
        };

        match key {
            "gateway_url" => self.gateway_url = value.trim_end_matches('/').to_string(),
            "api_prefix" => self.api_prefix = value.to_string(),
            "retry_backoff_ms" => self.retry_backoff_ms = parse_u64(value)?,
            "request_timeout_secs" => self.request_timeout_secs = parse_u64(value)?,
            "csrf_cookie" => self.csrf_cookie = value.to_string(),
            "geolocation_url" => self.geolocation_url = value.to_string(),
            "token_backend" => {
                self.token_backend = match value {
                    "file" => TokenBackend::File,
                    "keychain" => TokenBackend::Keychain,
                    other => {
                        return Err(StoreError::Config(format!("unknown token backend: {other}")));
                    }
                };
            }
            other => return Err(StoreError::Config(format!("unknown config key: {other}"))),
        }
        Ok(())
    }

    /// Returns the retry backoff.
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Returns the request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/remit/config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.retry_backoff(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"gateway_url":"https://gw.example.com","token_backend":"keychain"}"#)
            .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.gateway_url, "https://gw.example.com");
        assert_eq!(config.token_backend, TokenBackend::Keychain);
        assert_eq!(config.api_prefix, "/api/v1");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut config = Config::default();
        config.set("gateway_url", "https://gw.example.com/").unwrap();
        config.set("retry_backoff_ms", "250").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.gateway_url, "https://gw.example.com");
        assert_eq!(loaded.retry_backoff(), Duration::from_millis(250));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("retry_backoff_ms", "soon").is_err());
        assert!(config.set("token_backend", "vault").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert!(config.set("log_level", "debug").is_err());
    }
}
