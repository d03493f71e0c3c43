//! Authentication payloads.
//!
//! Request and response bodies for the `/auth` and `/users/me` endpoints.

use serde::{Deserialize, Serialize};

use super::user::RawUser;

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
    /// One-time code when TOTP is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totp_code: Option<String>,
}

impl LoginRequest {
    /// Creates a login request without a TOTP code.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            totp_code: None,
        }
    }

    /// Attaches a TOTP code.
    #[must_use]
    pub fn with_totp(mut self, code: impl Into<String>) -> Self {
        self.totp_code = Some(code.into());
        self
    }
}

/// Successful login response.
///
/// Gateway versions disagree on the token key, so each spelling is kept
/// separately and [`LoginResponse::token`] picks one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// Bearer access token under `token`.
    #[serde(default, rename = "token")]
    pub plain_token: Option<String>,
    /// Bearer access token under `access_token`.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Bearer access token under `accessToken`.
    #[serde(default, rename = "accessToken")]
    pub access_token_camel: Option<String>,
    /// The signed-in user, when the gateway includes it.
    #[serde(default)]
    pub user: Option<RawUser>,
}

impl LoginResponse {
    /// Returns the first non-empty token, in the order `token`,
    /// `access_token`, `accessToken`.
    pub fn token(&self) -> Option<&str> {
        [
            self.plain_token.as_deref(),
            self.access_token.as_deref(),
            self.access_token_camel.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
    }
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Country of residence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Account type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

/// Payload carrying a single e-mail address.
///
/// Used by password-reset requests, verification resends, magic links and
/// recovery e-mail updates.
#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest {
    /// Target e-mail address.
    pub email: String,
}

impl EmailRequest {
    /// Creates the payload.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Payload for `POST /auth/password/reset/confirm`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm {
    /// Reset token from the e-mail link.
    pub token: String,
    /// New password.
    pub password: String,
}

/// Payload for `POST /auth/verify`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailRequest {
    /// Verification token from the e-mail link.
    pub token: String,
}

/// Payload for `PUT /users/me/password`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChangeRequest {
    /// Current password.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Two-factor status from `GET /auth/totp/status`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TotpStatus {
    /// Whether TOTP is active on the account.
    #[serde(default)]
    pub enabled: bool,
}

/// Enrollment material from `POST /auth/totp/setup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotpSetup {
    /// Base32 shared secret.
    pub secret: String,
    /// `otpauth://` provisioning URI.
    #[serde(default, alias = "otpauthUrl", alias = "uri")]
    pub otpauth_url: Option<String>,
    /// QR code image as a data URL.
    #[serde(default, alias = "qrCode")]
    pub qr_code: Option<String>,
}

/// Payload carrying a one-time code.
#[derive(Debug, Clone, Serialize)]
pub struct TotpCodeRequest {
    /// Six-digit code.
    pub code: String,
}
