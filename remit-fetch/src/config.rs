//! Client configuration.
//!
//! Resolved once at startup and handed to the client explicitly; the client
//! itself never consults the environment.

use std::time::Duration;

use crate::paths::join_url;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default delay before the single transport retry.
const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;

/// User agent string for the Remit client.
const USER_AGENT: &str = concat!("remit/", env!("CARGO_PKG_VERSION"));

/// Settings for [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gateway root, e.g. `https://gateway.example.com`.
    pub gateway_url: String,
    /// API version prefix.
    pub api_prefix: String,
    /// Delay before retrying a failed transport attempt.
    pub retry_backoff: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Cookie carrying the CSRF token.
    pub csrf_cookie: String,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates settings for a gateway with default tuning.
    pub fn new(gateway_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            api_prefix: "/api/v1".to_string(),
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            csrf_cookie: "csrf_token".to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Sets the retry backoff.
    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the CSRF cookie name.
    #[must_use]
    pub fn with_csrf_cookie(mut self, name: impl Into<String>) -> Self {
        self.csrf_cookie = name.into();
        self
    }

    /// Returns the API base: gateway root joined with the prefix.
    pub fn api_base(&self) -> String {
        join_url(&self.gateway_url, &self.api_prefix)
    }
}

impl From<&remit_store::Config> for ClientConfig {
    fn from(config: &remit_store::Config) -> Self {
        Self {
            gateway_url: config.gateway_url.clone(),
            api_prefix: config.api_prefix.clone(),
            retry_backoff: config.retry_backoff(),
            timeout: config.request_timeout(),
            csrf_cookie: config.csrf_cookie.clone(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_normalizes_slashes() {
        assert_eq!(
            ClientConfig::new("https://gw.example.com/").api_base(),
            "https://gw.example.com/api/v1"
        );
        assert_eq!(
            ClientConfig::new("https://gw.example.com").api_base(),
            "https://gw.example.com/api/v1"
        );
    }

    #[test]
    fn test_from_store_config() {
        let mut store_config = remit_store::Config::default();
        store_config.retry_backoff_ms = 10;
        store_config.csrf_cookie = "XSRF-TOKEN".into();

        let config = ClientConfig::from(&store_config);
        assert_eq!(config.retry_backoff, Duration::from_millis(10));
        assert_eq!(config.csrf_cookie, "XSRF-TOKEN");
        assert_eq!(config.api_base(), "http://localhost:8000/api/v1");
    }
}
