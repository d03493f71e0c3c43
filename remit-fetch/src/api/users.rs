//! `/users/me` endpoints.

use remit_core::{EmailRequest, PasswordChangeRequest, RawUser};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::RequestOptions;
use crate::response::ResponseBody;

/// Current-user endpoints.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /users/me`. Accepts the user bare or under `user`.
    pub async fn me(&self) -> Result<RawUser, ApiError> {
        let body = self.client.request("/users/me", RequestOptions::get()).await?;
        unwrap_user(body)
    }

    /// `PATCH /users/me` with the changed fields.
    pub async fn update(&self, changes: &Value) -> Result<RawUser, ApiError> {
        let body = self
            .client
            .request("/users/me", RequestOptions::patch().json(changes)?)
            .await?;
        unwrap_user(body)
    }

    /// `PUT /users/me/password`.
    pub async fn change_password(
        &self,
        request: &PasswordChangeRequest,
    ) -> Result<ResponseBody, ApiError> {
        self.client
            .request("/users/me/password", RequestOptions::put().json(request)?)
            .await
    }

    /// `PUT /users/me/recovery-email`.
    pub async fn set_recovery_email(&self, email: &str) -> Result<ResponseBody, ApiError> {
        self.client
            .request(
                "/users/me/recovery-email",
                RequestOptions::put().json(&EmailRequest::new(email))?,
            )
            .await
    }
}

fn unwrap_user(body: ResponseBody) -> Result<RawUser, ApiError> {
    match body {
        ResponseBody::Json(Value::Object(mut map)) if map.get("user").is_some_and(Value::is_object) => {
            let user = map.remove("user").unwrap_or_default();
            ResponseBody::Json(user).decode()
        }
        other => other.decode(),
    }
}
