//! Payment types.
//!
//! - [`PaymentRequest`] - Outgoing payload for creating a transfer
//! - [`Payment`] - A transfer as reported by the payment engine
//! - [`Receipt`] - Receipt document for a completed transfer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Payment Request
// ============================================================================

/// Payload for `POST /payments` and `POST /payments/initiate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    /// Source wallet identifier.
    pub from_wallet_id: String,
    /// Recipient wallet address.
    pub to_address: String,
    /// Amount in the source wallet's currency.
    pub amount: f64,
    /// Source currency.
    pub currency: String,
    /// Destination currency, if a conversion is involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_currency: Option<String>,
    /// Note shown to the recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ============================================================================
// Payment
// ============================================================================

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Created but not yet processed.
    #[default]
    Pending,
    /// Being settled.
    Processing,
    /// Settled.
    Completed,
    /// Rejected or errored.
    Failed,
    /// Cancelled by the sender.
    Cancelled,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A transfer as reported by `/payments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment identifier.
    pub id: String,
    /// Amount debited from the sender.
    pub amount: f64,
    /// Sender currency.
    pub currency: String,
    /// Amount credited to the recipient.
    #[serde(
        default,
        alias = "targetAmount",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_amount: Option<f64>,
    /// Recipient currency.
    #[serde(
        default,
        alias = "targetCurrency",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_currency: Option<String>,
    /// Current status.
    #[serde(default)]
    pub status: PaymentStatus,
    /// Recipient display name.
    #[serde(
        default,
        alias = "recipientName",
        skip_serializing_if = "Option::is_none"
    )]
    pub recipient_name: Option<String>,
    /// Creation timestamp.
    #[serde(
        default,
        alias = "createdAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Receipt
// ============================================================================

/// Receipt for a payment from `GET /payments/{id}/receipt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Payment identifier.
    #[serde(alias = "paymentId")]
    pub payment_id: String,
    /// Human-readable reference number.
    #[serde(default)]
    pub reference: Option<String>,
    /// Amount sent.
    pub amount: f64,
    /// Sender currency.
    pub currency: String,
    /// Exchange rate applied.
    #[serde(default, alias = "exchangeRate")]
    pub exchange_rate: Option<f64>,
    /// Fee charged.
    #[serde(default)]
    pub fee: Option<f64>,
    /// Settlement timestamp.
    #[serde(default, alias = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
}
