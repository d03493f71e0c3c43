//! `/auth` endpoints.

use remit_core::{
    EmailRequest, LoginRequest, LoginResponse, PasswordResetConfirm, RawUser, RegisterRequest,
    TotpCodeRequest, TotpSetup, TotpStatus, VerifyEmailRequest,
};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::RequestOptions;
use crate::response::ResponseBody;

/// Authentication endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login`. Does not touch stored state; see
    /// [`crate::session::login`] for the full flow.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client.post_json("/auth/login", request).await
    }

    /// `POST /auth/register`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<RawUser>, ApiError> {
        let body = self
            .client
            .request("/auth/register", RequestOptions::post().json(request)?)
            .await?;
        Ok(user_from(body))
    }

    /// `POST /auth/password/reset`.
    pub async fn request_password_reset(&self, email: &str) -> Result<ResponseBody, ApiError> {
        self.post("/auth/password/reset", &EmailRequest::new(email)).await
    }

    /// `POST /auth/password/reset/confirm`.
    pub async fn confirm_password_reset(
        &self,
        request: &PasswordResetConfirm,
    ) -> Result<ResponseBody, ApiError> {
        self.post("/auth/password/reset/confirm", request).await
    }

    /// `POST /auth/verify`.
    pub async fn verify_email(&self, token: &str) -> Result<ResponseBody, ApiError> {
        self.post(
            "/auth/verify",
            &VerifyEmailRequest {
                token: token.to_string(),
            },
        )
        .await
    }

    /// `POST /auth/verify/resend`.
    pub async fn resend_verification(&self, email: &str) -> Result<ResponseBody, ApiError> {
        self.post("/auth/verify/resend", &EmailRequest::new(email)).await
    }

    /// `POST /auth/magic-link`.
    pub async fn request_magic_link(&self, email: &str) -> Result<ResponseBody, ApiError> {
        self.post("/auth/magic-link", &EmailRequest::new(email)).await
    }

    // ========================================================================
    // TOTP
    // ========================================================================

    /// `GET /auth/totp/status`.
    pub async fn totp_status(&self) -> Result<TotpStatus, ApiError> {
        self.client.get_json("/auth/totp/status").await
    }

    /// `POST /auth/totp/setup`.
    pub async fn totp_setup(&self) -> Result<TotpSetup, ApiError> {
        self.client.send("/auth/totp/setup", RequestOptions::post()).await
    }

    /// `POST /auth/totp/verify`.
    pub async fn totp_verify(&self, code: &str) -> Result<ResponseBody, ApiError> {
        self.post("/auth/totp/verify", &code_request(code)).await
    }

    /// `POST /auth/totp/disable`.
    pub async fn totp_disable(&self, code: &str) -> Result<ResponseBody, ApiError> {
        self.post("/auth/totp/disable", &code_request(code)).await
    }

    async fn post<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<ResponseBody, ApiError> {
        self.client
            .request(path, RequestOptions::post().json(body)?)
            .await
    }
}

fn code_request(code: &str) -> TotpCodeRequest {
    TotpCodeRequest {
        code: code.to_string(),
    }
}

/// Extracts the user from a registration response, bare or under `user`.
fn user_from(body: ResponseBody) -> Option<RawUser> {
    let value = body.as_json()?;
    let user = value.get("user").unwrap_or(value);
    match user {
        Value::Object(_) => serde_json::from_value(user.clone()).ok(),
        _ => None,
    }
}
