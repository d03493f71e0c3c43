//! User types.
//!
//! This module contains the two shapes a user takes on the client:
//! - [`RawUser`] - The backend object, cached verbatim in storage
//! - [`UserProfile`] - The display snapshot derived from it
//!
//! The account label shown next to a user is derived from the country code
//! and user type through [`AccountLabel::derive`].

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Raw User
// ============================================================================

/// User object as returned by the gateway and cached in storage.
///
/// Every field is optional so a partially populated cache entry still loads.
/// Fields the client does not model are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawUser {
    /// Full display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Given name.
    #[serde(default, alias = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Family name.
    #[serde(default, alias = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// E-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Phone number under its long key; read when `phone` is absent.
    #[serde(default, alias = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// KYC status as reported by the compliance service.
    #[serde(default, alias = "kycStatus", skip_serializing_if = "Option::is_none")]
    pub kyc_status: Option<String>,

    /// Avatar image URL.
    #[serde(default, alias = "avatarUrl", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Avatar under its short key; read when `avatar_url` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// ISO 3166-1 alpha-2 country code.
    #[serde(default, alias = "countryCode", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    /// Free-form country; some services send a name here, others a code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Account type (`individual`, `merchant`, `agent`).
    #[serde(default, alias = "userType", skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawUser {
    /// Creates a raw user with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Resolves the display name.
    ///
    /// Falls back from `name` to `first_name last_name`, then to the local
    /// part of the e-mail address, then to `"User"`.
    pub fn display_name(&self) -> String {
        if let Some(name) = non_empty(self.name.as_deref()) {
            return name.to_string();
        }

        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .filter_map(non_empty)
            .collect();
        if !parts.is_empty() {
            return parts.join(" ");
        }

        if let Some(local) = non_empty(self.email.as_deref())
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
        {
            return local.to_string();
        }

        "User".to_string()
    }

    /// Resolves the country code.
    ///
    /// `country_code` wins; `country` is used only when it is absent and
    /// holds a two-letter code. The result is uppercased.
    pub fn resolved_country_code(&self) -> Option<String> {
        non_empty(self.country_code.as_deref())
            .or_else(|| non_empty(self.country.as_deref()).filter(|c| is_alpha2(c)))
            .map(str::to_ascii_uppercase)
    }

    /// Resolves the phone number, preferring `phone`.
    pub fn resolved_phone(&self) -> Option<&str> {
        non_empty(self.phone.as_deref()).or_else(|| non_empty(self.phone_number.as_deref()))
    }

    /// Resolves the avatar URL, preferring `avatar_url`.
    pub fn resolved_avatar_url(&self) -> Option<&str> {
        non_empty(self.avatar_url.as_deref()).or_else(|| non_empty(self.avatar.as_deref()))
    }
}

fn is_alpha2(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|b| b.is_ascii_alphabetic())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// User Type
// ============================================================================

/// Kind of account on the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// A person sending or receiving money.
    Individual,
    /// A business receiving payments.
    Merchant,
    /// A cash-in/cash-out agent.
    Agent,
}

impl UserType {
    /// Parses a user type case-insensitively.
    ///
    /// Returns `None` for unrecognized values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "individual" | "personal" => Some(Self::Individual),
            "merchant" | "business" => Some(Self::Merchant),
            "agent" => Some(Self::Agent),
            _ => None,
        }
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Merchant => "merchant",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// KYC Status
// ============================================================================

/// Identity verification state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    /// No documents submitted.
    #[default]
    NotStarted,
    /// Submitted and awaiting review.
    Pending,
    /// Identity verified.
    Verified,
    /// Submission rejected.
    Rejected,
}

impl KycStatus {
    /// Maps the compliance service's status strings onto [`KycStatus`].
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::NotStarted;
        };

        match value.trim().to_ascii_lowercase().as_str() {
            "verified" | "approved" | "completed" => Self::Verified,
            "pending" | "submitted" | "in_review" | "under_review" => Self::Pending,
            "rejected" | "failed" | "declined" => Self::Rejected,
            _ => Self::NotStarted,
        }
    }

    /// Returns true if the user may transact.
    pub fn is_verified(&self) -> bool {
        *self == Self::Verified
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "Not started"),
            Self::Pending => write!(f, "Pending review"),
            Self::Verified => write!(f, "Verified"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

// ============================================================================
// Account Label
// ============================================================================

/// Account label shown next to the user's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountLabel {
    /// Individual account registered in Malawi.
    SenderMalawi,
    /// Merchant or agent account registered in China.
    ReceiverChina,
    /// Merchant account anywhere else.
    Business,
    /// Agent account anywhere else.
    Agent,
    /// Everything else.
    Personal,
}

impl AccountLabel {
    /// Derives the label from a country code and user type.
    ///
    /// Country codes compare case-insensitively.
    pub fn derive(country_code: Option<&str>, user_type: Option<UserType>) -> Self {
        let country = country_code
            .map(|c| c.trim().to_ascii_uppercase())
            .unwrap_or_default();

        match (country.as_str(), user_type) {
            ("MW", Some(UserType::Individual)) => Self::SenderMalawi,
            ("CN", Some(UserType::Merchant | UserType::Agent)) => Self::ReceiverChina,
            (_, Some(UserType::Merchant)) => Self::Business,
            (_, Some(UserType::Agent)) => Self::Agent,
            _ => Self::Personal,
        }
    }

    /// Returns the display text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SenderMalawi => "Sender (Malawi)",
            Self::ReceiverChina => "Receiver (China)",
            Self::Business => "Business Account",
            Self::Agent => "Agent Account",
            Self::Personal => "Personal Account",
        }
    }
}

impl fmt::Display for AccountLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AccountLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// User Profile
// ============================================================================

/// Display snapshot of the signed-in user.
///
/// Derived once from a [`RawUser`] at login or hydration time and replaced
/// wholesale on profile updates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// E-mail address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// KYC status.
    pub kyc_status: KycStatus,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Derived account label.
    pub account_label: AccountLabel,
    /// Uppercased country code.
    pub country_code: Option<String>,
    /// Parsed user type.
    pub user_type: Option<UserType>,
}

impl UserProfile {
    /// Derives the display profile from a raw backend user.
    pub fn from_raw(raw: &RawUser) -> Self {
        let country_code = raw.resolved_country_code();
        let user_type = raw.user_type.as_deref().and_then(UserType::parse);

        Self {
            name: raw.display_name(),
            email: non_empty(raw.email.as_deref()).map(str::to_string),
            phone: raw.resolved_phone().map(str::to_string),
            kyc_status: KycStatus::parse(raw.kyc_status.as_deref()),
            avatar_url: raw.resolved_avatar_url().map(str::to_string),
            account_label: AccountLabel::derive(country_code.as_deref(), user_type),
            country_code,
            user_type,
        }
    }
}

impl From<&RawUser> for UserProfile {
    fn from(raw: &RawUser) -> Self {
        Self::from_raw(raw)
    }
}

// ============================================================================
// Tests
// ============================================================================
