//! HTTP transport.
//!
//! [`Transport`] is the seam between the API client and the network. The
//! production implementation wraps reqwest with a cookie jar; tests supply
//! scripted transports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::error::TransportError;
use crate::request::RequestBody;

// ============================================================================
// Wire Types
// ============================================================================

/// A fully prepared request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: Url,
    /// Final header set.
    pub headers: HeaderMap,
    /// Body.
    pub body: RequestBody,
}

/// A raw response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Sends prepared requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request. Any HTTP status is a successful exchange; only a
    /// failure to get a response is an error.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Returns a cookie the transport holds for `url`.
    fn cookie(&self, _url: &Url, _name: &str) -> Option<String> {
        None
    }
}

// ============================================================================
// Reqwest Transport
// ============================================================================

/// reqwest-backed transport with a shared cookie jar.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self { inner, jar })
    }

    /// Returns the cookie jar.
    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .inner
            .request(request.method, request.url)
            .headers(request.headers);

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Text(text) => builder.body(text),
            RequestBody::Multipart(form) => builder.multipart(form.to_reqwest()?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!(status = %status, bytes = body.len(), "Response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn cookie(&self, url: &Url, name: &str) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let header = header.to_str().ok()?;
        find_cookie(header, name)
    }
}

/// Finds a cookie in a `Cookie` header value.
fn find_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_cookie() {
        let header = "session=abc; csrf_token=xyz; theme=dark";
        assert_eq!(find_cookie(header, "csrf_token").as_deref(), Some("xyz"));
        assert_eq!(find_cookie(header, "missing"), None);
    }

    #[test]
    fn test_reqwest_transport_reads_jar() {
        let transport = ReqwestTransport::new(Duration::from_secs(5), "remit-test").unwrap();
        let url = Url::parse("https://gw.example.com/api/v1/payments").unwrap();

        assert_eq!(transport.cookie(&url, "csrf_token"), None);

        transport
            .jar()
            .add_cookie_str("csrf_token=tok123; Path=/", &url);
        assert_eq!(transport.cookie(&url, "csrf_token").as_deref(), Some("tok123"));
    }
}
