//! Typed endpoint wrappers.
//!
//! Each group borrows the client and maps one gateway resource:
//!
//! - [`AuthApi`] - Registration, password reset, verification, TOTP
//! - [`WalletsApi`] - Wallet listing, deposits, address lookup
//! - [`PaymentsApi`] - Transfers and receipts
//! - [`ForexApi`] - Rates and conversion quotes
//! - [`UsersApi`] - Current user profile and account settings
//! - [`ComplianceApi`] - KYC document submission

mod auth;
mod compliance;
mod forex;
mod payments;
mod users;
mod wallets;

pub use auth::AuthApi;
pub use compliance::{ComplianceApi, KycDocument, KycSubmission};
pub use forex::{ForexApi, HistoryQuery};
pub use payments::{PaymentDraft, PaymentsApi};
pub use users::UsersApi;
pub use wallets::WalletsApi;

use crate::client::ApiClient;

impl ApiClient {
    /// Authentication endpoints.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Wallet endpoints.
    pub fn wallets(&self) -> WalletsApi<'_> {
        WalletsApi::new(self)
    }

    /// Payment endpoints.
    pub fn payments(&self) -> PaymentsApi<'_> {
        PaymentsApi::new(self)
    }

    /// Forex endpoints.
    pub fn forex(&self) -> ForexApi<'_> {
        ForexApi::new(self)
    }

    /// User endpoints.
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Compliance endpoints.
    pub fn compliance(&self) -> ComplianceApi<'_> {
        ComplianceApi::new(self)
    }
}

/// Appends URL-encoded query pairs to `path`, skipping `None` values.
fn with_query(path: &str, pairs: &[(&str, Option<&str>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            any = true;
        }
    }

    if any {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}

/// Percent-encodes one path segment.
fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
