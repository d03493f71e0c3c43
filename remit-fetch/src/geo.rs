//! IP geolocation lookup for the device country.

use std::time::Duration;

use async_trait::async_trait;
use remit_store::CountryResolver;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

/// Default lookup endpoint.
pub const DEFAULT_GEOLOCATION_URL: &str = "https://ipapi.co/json/";

/// Lookup timeout; the country is advisory.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves the device country from the public IP.
#[derive(Debug, Clone)]
pub struct IpGeolocationResolver {
    client: Client,
    url: String,
}

impl IpGeolocationResolver {
    /// Creates a resolver for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client for geolocation");
                Client::new()
            });

        Self {
            client,
            url: url.into(),
        }
    }

    async fn lookup(&self) -> Result<Value, reqwest::Error> {
        self.client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

impl Default for IpGeolocationResolver {
    fn default() -> Self {
        Self::new(DEFAULT_GEOLOCATION_URL)
    }
}

#[async_trait]
impl CountryResolver for IpGeolocationResolver {
    async fn resolve_country(&self) -> Option<String> {
        match self.lookup().await {
            Ok(payload) => {
                let country = country_from(&payload);
                debug!(country = ?country, "Geolocation lookup finished");
                country
            }
            Err(e) => {
                warn!(error = %e, url = %self.url, "Geolocation lookup failed");
                None
            }
        }
    }
}

/// Reads the country code from a lookup payload.
fn country_from(payload: &Value) -> Option<String> {
    ["country_code", "countryCode", "country"]
        .iter()
        .find_map(|key| payload.get(key).and_then(Value::as_str))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_field_fallbacks() {
        let payload = serde_json::json!({"country_code": "MW", "country": "Malawi"});
        assert_eq!(country_from(&payload).as_deref(), Some("MW"));

        let payload = serde_json::json!({"country": "CN"});
        assert_eq!(country_from(&payload).as_deref(), Some("CN"));

        assert_eq!(country_from(&serde_json::json!({"ip": "1.2.3.4"})), None);
    }
}
