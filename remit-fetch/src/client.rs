//! Gateway API client.
//!
//! [`ApiClient::request`] is the single entry point every gateway call goes
//! through. It attaches the ambient headers, runs the attempt under a
//! [`RetryPolicy`], parses the body, normalizes errors, and turns a 401 on
//! a protected path into a [`SessionEvent::Expired`].

use std::sync::Arc;

use remit_core::SessionStore;
use remit_store::TokenStore;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::paths::{is_open_auth_path, join_url};
use crate::request::{
    CSRF_HEADER, DEVICE_ID_HEADER, IDEMPOTENCY_KEY_HEADER, MultipartForm, RequestOptions,
    is_safe_method,
};
use crate::response::ResponseBody;
use crate::retry::RetryPolicy;
use crate::session::SessionEvent;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Capacity of the session event channel.
const EVENT_CAPACITY: usize = 16;

// ============================================================================
// API Client
// ============================================================================

/// Client for the Remit gateway.
pub struct ApiClient {
    config: ClientConfig,
    base: String,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    device_id: String,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Starts building a client.
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            transport: None,
            session: None,
            device_id: None,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the injected session store.
    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Returns the device identifier sent with every request.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Builds the outgoing request for `path` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] or [`ApiError::InvalidHeader`].
    pub fn prepare(&self, path: &str, options: RequestOptions) -> Result<HttpRequest, ApiError> {
        let raw_url = join_url(&self.base, path);
        let url = Url::parse(&raw_url).map_err(|e| ApiError::InvalidUrl(format!("{raw_url}: {e}")))?;

        let open = is_open_auth_path(path);
        let safe = is_safe_method(&options.method);
        let mut headers = options.headers;

        if options.body.is_multipart() {
            headers.remove(CONTENT_TYPE);
        } else if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if !open && !headers.contains_key(AUTHORIZATION) {
            if let Some(token) = self.session.token().filter(|t| !t.is_empty()) {
                insert(&mut headers, "authorization", &format!("Bearer {token}"))?;
            }
        }

        if !headers.contains_key(DEVICE_ID_HEADER) {
            insert(&mut headers, DEVICE_ID_HEADER, &self.device_id)?;
        }

        if !safe {
            if !headers.contains_key(CSRF_HEADER) {
                if let Some(csrf) = self.transport.cookie(&url, &self.config.csrf_cookie) {
                    insert(&mut headers, CSRF_HEADER, &csrf)?;
                }
            }

            if !open && !headers.contains_key(IDEMPOTENCY_KEY_HEADER) {
                insert(&mut headers, IDEMPOTENCY_KEY_HEADER, &Uuid::new_v4().to_string())?;
            }
        }

        debug!(
            url = %url,
            open_auth = open,
            has_idempotency_key = headers.contains_key(IDEMPOTENCY_KEY_HEADER),
            "Prepared request"
        );

        Ok(HttpRequest {
            method: options.method,
            url,
            headers,
            body: options.body,
        })
    }

    /// Sends a request and returns the parsed body of a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] for non-2xx responses
    /// - [`ApiError::Connectivity`] when a retryable request failed twice
    /// - [`ApiError::Transport`] when a non-retryable request failed
    #[instrument(skip(self, path, options), fields(method = %options.method, path = %path))]
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
        let request = self.prepare(path, options)?;
        let policy = RetryPolicy::for_request(
            &request.method,
            request.headers.contains_key(IDEMPOTENCY_KEY_HEADER),
            self.config.retry_backoff,
        );

        let response = policy
            .execute(|attempt| {
                let request = request.clone();
                async move {
                    debug!(attempt = attempt, "Sending request");
                    self.transport.send(request).await
                }
            })
            .await
            .map_err(|failure| {
                let url = request.url.to_string();
                if policy.retryable {
                    ApiError::Connectivity {
                        url,
                        attempts: failure.attempts,
                        source: failure.error,
                    }
                } else {
                    ApiError::Transport {
                        url,
                        source: failure.error,
                    }
                }
            })?;

        self.handle_response(path, &response)
    }

    fn handle_response(&self, path: &str, response: &HttpResponse) -> Result<ResponseBody, ApiError> {
        let status = response.status;
        let body = ResponseBody::parse(&response.headers, &response.body);

        if status.is_success() {
            debug!(status = status.as_u16(), "Request succeeded");
            return Ok(body);
        }

        let message = body.error_message(&response.body, status);
        warn!(status = status.as_u16(), message = %message, "Gateway returned an error");

        let session_expired = status == StatusCode::UNAUTHORIZED && !is_open_auth_path(path);
        if session_expired {
            self.expire_session(path);
        }

        Err(ApiError::Http {
            status: status.as_u16(),
            message,
            data: body,
            session_expired,
        })
    }

    fn expire_session(&self, path: &str) {
        info!(path = %path, "Session rejected, clearing stored credentials");
        self.session.clear();
        // No subscribers is fine; nobody needs to navigate.
        let _ = self.events.send(SessionEvent::Expired {
            path: path.to_string(),
        });
    }

    // ========================================================================
    // Typed Helpers
    // ========================================================================

    /// Sends `options` and decodes the success payload.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::request`] returns, plus [`ApiError::Decode`].
    pub async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(path, options).await?.decode()
    }

    /// GET and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(path, RequestOptions::get()).await
    }

    /// POST a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(path, RequestOptions::post().json(body)?).await
    }

    /// PUT a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(path, RequestOptions::put().json(body)?).await
    }

    /// PATCH a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(path, RequestOptions::patch().json(body)?).await
    }

    /// DELETE, returning the raw body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<ResponseBody, ApiError> {
        self.request(path, RequestOptions::delete()).await
    }

    /// POST a multipart form and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<T, ApiError> {
        self.send(path, RequestOptions::post().multipart(form)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base)
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), ApiError> {
    let value = HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
    headers.insert(name, value);
    Ok(())
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    session: Option<Arc<dyn SessionStore>>,
    device_id: Option<String>,
}

impl ApiClientBuilder {
    /// Uses a custom transport instead of reqwest.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Injects the token/profile store. Defaults to an in-memory store.
    #[must_use]
    pub fn session_store(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the device identifier. Defaults to a fresh UUID.
    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] for a malformed gateway URL and
    /// [`ApiError::Transport`] if the default transport cannot be built.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base = self.config.api_base();
        Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let transport = ReqwestTransport::new(self.config.timeout, &self.config.user_agent)
                    .map_err(|source| ApiError::Transport {
                        url: base.clone(),
                        source,
                    })?;
                Arc::new(transport)
            }
        };

        let session = self
            .session
            .unwrap_or_else(|| Arc::new(TokenStore::in_memory()));
        let device_id = self
            .device_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        debug!(base = %base, "API client ready");
        Ok(ApiClient {
            config: self.config,
            base,
            transport,
            session,
            device_id,
            events,
        })
    }
}
