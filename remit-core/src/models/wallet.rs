//! Wallet types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single-currency wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Wallet identifier.
    pub id: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Available balance.
    #[serde(default)]
    pub balance: f64,
    /// Public address used for lookups and transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Owner display name, when returned by lookups.
    #[serde(
        default,
        alias = "ownerName",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_name: Option<String>,
    /// Creation timestamp.
    #[serde(
        default,
        alias = "createdAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /wallets/{id}/deposit`.
#[derive(Debug, Clone, Serialize)]
pub struct DepositRequest {
    /// Amount in the wallet's currency.
    pub amount: f64,
    /// Funding method (e.g. `mobile_money`, `bank_transfer`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Free-form reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Result of `GET /wallets/lookup?address=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletLookup {
    /// Looked-up address.
    pub address: String,
    /// Wallet currency.
    pub currency: String,
    /// Display name of the recipient.
    #[serde(default, alias = "ownerName")]
    pub owner_name: Option<String>,
    /// Derived account label of the recipient.
    #[serde(default, alias = "accountLabel")]
    pub account_label: Option<String>,
}
