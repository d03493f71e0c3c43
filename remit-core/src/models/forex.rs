//! Forex types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for `POST /forex/calculate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForexCalculateRequest {
    /// Source currency.
    pub from: String,
    /// Target currency.
    pub to: String,
    /// Amount in the source currency.
    pub amount: f64,
}

/// Conversion quote returned by `/forex/calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForexQuote {
    /// Source currency.
    pub from: String,
    /// Target currency.
    pub to: String,
    /// Amount in the source currency.
    pub amount: f64,
    /// Amount the recipient receives.
    #[serde(alias = "convertedAmount")]
    pub converted_amount: f64,
    /// Rate applied.
    pub rate: f64,
    /// Fee in the source currency.
    #[serde(default)]
    pub fee: f64,
}

/// Rate for a currency pair from `/forex/rate/{from}/{to}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForexRate {
    /// Source currency.
    pub from: String,
    /// Target currency.
    pub to: String,
    /// Units of `to` per unit of `from`.
    pub rate: f64,
    /// When the rate was published.
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One historical sample from `/forex/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Sample timestamp.
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    /// Rate at that time.
    pub rate: f64,
}
